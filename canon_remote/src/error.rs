use simple_error::SimpleError;
use thiserror::Error;

use crate::command::CommandId;
use crate::validate::Direction;

#[derive(Error, Debug)]
pub enum Error {
    /// Not a device fault: the caller handed over an identifier the registry does not know.
    #[error("unknown remote control command {0}")]
    UnknownCommand(String),

    #[error("command table lists {0} more than once")]
    DuplicateCommand(CommandId),

    #[error(
        "unexpected {direction} length for {id} (expected 0x{expected:x}, got 0x{actual:x}), \
         possible firmware/protocol version mismatch"
    )]
    LengthMismatch {
        id: CommandId,
        direction: Direction,
        expected: usize,
        actual: usize,
    },

    #[error("control write was incomplete ({written} of {expected} bytes)")]
    IncompleteWrite { written: usize, expected: usize },

    #[error("short reply from camera ({received} bytes, needed {expected})")]
    ShortReply { expected: usize, received: usize },

    #[error("camera declares a 0x{declared:x} byte reply, more than the 0x{limit:x} limit")]
    OversizedReply { declared: usize, limit: usize },

    #[error("usb transfer failed: {0}")]
    Usb(#[from] rusb::Error),

    #[error(transparent)]
    Device(#[from] SimpleError),
}
