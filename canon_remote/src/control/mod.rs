pub mod packet;
pub mod usb;

use bytes::BytesMut;
use log::{debug, info, trace, warn};

use crate::command::{CommandDescriptor, CommandId};
use crate::error::Error;
use crate::registry::Registry;
use crate::validate::{validate_reply, validate_request, Direction, Outcome};
use packet::{
    Serial, MAX_CHUNK_SIZE, MAX_REPLY_BODY, MIN_REPLY_BODY, REPLY_HEADER_LEN, REPLY_LENGTH_OFFSET,
};

// wValue of the control-out transfer carrying a command block
const COMMAND_WVALUE: u16 = 0x10;

/// The two transfers a remote control exchange needs.
///
/// Implementations only move bytes; framing and validation happen in
/// [`RemoteControl`]. Callers must not interleave exchanges on one device.
pub trait ControlTransport {
    /// Vendor control-out to the device. Returns the number of bytes written.
    fn control_write(&mut self, value: u16, data: &[u8]) -> Result<usize, Error>;

    /// Bulk-in of at most `len` bytes.
    fn bulk_read(&mut self, len: usize) -> Result<BytesMut, Error>;
}

/// What to do when a transfer length disagrees with the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Log and carry on.
    #[default]
    Permissive,
    /// Fail the exchange with [`Error::LengthMismatch`].
    Strict,
}

/// A completed exchange.
#[derive(Debug, Clone)]
pub struct Reply {
    pub id: CommandId,
    pub request: Outcome,
    pub reply: Outcome,
    pub status: Option<u32>,
    data: BytesMut,
}

impl Reply {
    pub fn header(&self) -> &[u8] {
        &self.data[..REPLY_HEADER_LEN]
    }

    /// Everything after the 0x40 byte header, as declared by the camera.
    pub fn body(&self) -> &[u8] {
        &self.data[REPLY_HEADER_LEN..]
    }

    pub fn into_bytes(self) -> BytesMut {
        self.data
    }
}

/// Runs remote release control commands over a [`ControlTransport`].
pub struct RemoteControl<T> {
    transport: T,
    registry: &'static Registry,
    serial: Serial,
    policy: LengthPolicy,
}

impl<T: ControlTransport> RemoteControl<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            registry: Registry::global(),
            serial: Serial::new(),
            policy: LengthPolicy::default(),
        }
    }

    pub fn with_registry(mut self, registry: &'static Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_policy(mut self, policy: LengthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> LengthPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Sends `id` with `args` as argument words and reads the reply.
    pub fn execute(&mut self, id: CommandId, args: &[u32]) -> Result<Reply, Error> {
        let descriptor = *self.registry.lookup_by_id(id)?;
        let payload = packet::encode_payload(descriptor.opcode, args);
        self.exchange(&descriptor, &payload)
    }

    /// Sends `payload` verbatim after the command block, subcode included.
    ///
    /// For requests that are not a whole number of words, like the 0x15 byte
    /// SET_EXT_PARAMS request.
    pub fn execute_payload(&mut self, id: CommandId, payload: &[u8]) -> Result<Reply, Error> {
        let descriptor = *self.registry.lookup_by_id(id)?;
        self.exchange(&descriptor, payload)
    }

    fn exchange(
        &mut self,
        descriptor: &CommandDescriptor,
        payload: &[u8],
    ) -> Result<Reply, Error> {
        let id = descriptor.id;
        let request_size = packet::request_size(payload.len());
        let request = self.check(
            descriptor,
            Direction::Request,
            validate_request(descriptor, request_size),
        )?;

        let serial = self.serial.next();
        let block = packet::command_block(payload, serial);

        info!(
            ">>> {} (0x{:02x}) request 0x{:x} #{}",
            id, descriptor.opcode, request_size, serial
        );
        trace!("{}", hex::encode(&block));

        let written = self.transport.control_write(COMMAND_WVALUE, &block)?;
        if written != block.len() {
            return Err(Error::IncompleteWrite {
                written,
                expected: block.len(),
            });
        }

        let data = self.read_reply(descriptor)?;
        let body_len = data.len() - REPLY_HEADER_LEN;
        let reply = self.check(
            descriptor,
            Direction::Reply,
            validate_reply(descriptor, body_len),
        )?;
        let status = packet::reply_status(&data);

        info!(
            "<<< {} reply 0x{:x} #{} status {:?}",
            id, body_len, serial, status
        );
        trace!("{}", hex::encode(&data));

        Ok(Reply {
            id,
            request,
            reply,
            status,
            data,
        })
    }

    // Reads header plus the declared body, trimmed to what the camera declared.
    fn read_reply(&mut self, descriptor: &CommandDescriptor) -> Result<BytesMut, Error> {
        let wanted = REPLY_HEADER_LEN
            + descriptor
                .reply_contract()
                .map_or(MIN_REPLY_BODY, |len| (len.get() as usize).max(MIN_REPLY_BODY));

        let mut data = self.transport.bulk_read(wanted)?;

        // need at least up to the length word
        self.read_until(&mut data, REPLY_LENGTH_OFFSET + 4)
            .map_err(|err| match err {
                Error::ShortReply { received, .. } => Error::ShortReply {
                    expected: wanted,
                    received,
                },
                err => err,
            })?;

        let declared = match packet::reply_body_length(&data) {
            Some(len) => len,
            None => {
                return Err(Error::ShortReply {
                    expected: wanted,
                    received: data.len(),
                })
            }
        };
        if declared > MAX_REPLY_BODY {
            return Err(Error::OversizedReply {
                declared,
                limit: MAX_REPLY_BODY,
            });
        }

        let total = REPLY_HEADER_LEN + declared;
        if total > data.len() {
            debug!(
                "{} declares 0x{:x} reply bytes, reading 0x{:x} more",
                descriptor.id,
                declared,
                total - data.len()
            );
            self.read_until(&mut data, total)?;
        }

        data.truncate(total);
        Ok(data)
    }

    // Bulk reads in chunks of at most MAX_CHUNK_SIZE until `data` holds `total` bytes.
    fn read_until(&mut self, data: &mut BytesMut, total: usize) -> Result<(), Error> {
        while data.len() < total {
            let chunk = (total - data.len()).min(MAX_CHUNK_SIZE);
            let rest = self.transport.bulk_read(chunk)?;
            if rest.is_empty() {
                return Err(Error::ShortReply {
                    expected: total,
                    received: data.len(),
                });
            }
            data.extend_from_slice(&rest);
        }
        Ok(())
    }

    fn check(
        &self,
        descriptor: &CommandDescriptor,
        direction: Direction,
        outcome: Outcome,
    ) -> Result<Outcome, Error> {
        match outcome {
            Outcome::Exact => {}
            Outcome::Unvalidated => {
                debug!("{} {} length is unvalidated", descriptor.id, direction)
            }
            Outcome::Mismatch { expected, actual } => warn!(
                "{} {} length 0x{:x} instead of 0x{:x}, \
                 possible firmware/protocol version mismatch",
                descriptor.id, direction, actual, expected
            ),
        }

        match self.policy {
            LengthPolicy::Permissive => Ok(outcome),
            LengthPolicy::Strict => outcome.into_result(descriptor.id, direction),
        }
    }
}
