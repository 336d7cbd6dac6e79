mod table;

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::Error;

pub(crate) use table::COMMAND_TABLE;

const NAME_PREFIX: &str = "CANON_USB_CONTROL_";

/// Remote release control subcommands, in the order of the command table.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandId {
    Init,
    ShutterRelease,
    SetParams,
    SetTransferMode,
    GetParams,
    GetZoomPos,
    SetZoomPos,
    GetAvailableShot,
    GetCustomFunc,
    GetExtParamsSize,
    GetExtParams,
    SetExtParams,
    Exit,
    // New subcodes for new version of protocol
    Unknown1,
    Unknown2,
    // Present in Canon headers, not seen in captures yet
    ViewfinderStart,
    ViewfinderStop,
    SetCustomFunc,
    GetExtParamsVer,
    SelectCamOutput,
    DoAeAfAwb,
}

impl CommandId {
    pub const ALL: [CommandId; 21] = [
        CommandId::Init,
        CommandId::ShutterRelease,
        CommandId::SetParams,
        CommandId::SetTransferMode,
        CommandId::GetParams,
        CommandId::GetZoomPos,
        CommandId::SetZoomPos,
        CommandId::GetAvailableShot,
        CommandId::GetCustomFunc,
        CommandId::GetExtParamsSize,
        CommandId::GetExtParams,
        CommandId::SetExtParams,
        CommandId::Exit,
        CommandId::Unknown1,
        CommandId::Unknown2,
        CommandId::ViewfinderStart,
        CommandId::ViewfinderStop,
        CommandId::SetCustomFunc,
        CommandId::GetExtParamsVer,
        CommandId::SelectCamOutput,
        CommandId::DoAeAfAwb,
    ];

    /// The symbolic name used by the Canon headers, e.g. `CANON_USB_CONTROL_INIT`.
    pub fn name(self) -> &'static str {
        match self {
            CommandId::Init => "CANON_USB_CONTROL_INIT",
            CommandId::ShutterRelease => "CANON_USB_CONTROL_SHUTTER_RELEASE",
            CommandId::SetParams => "CANON_USB_CONTROL_SET_PARAMS",
            CommandId::SetTransferMode => "CANON_USB_CONTROL_SET_TRANSFER_MODE",
            CommandId::GetParams => "CANON_USB_CONTROL_GET_PARAMS",
            CommandId::GetZoomPos => "CANON_USB_CONTROL_GET_ZOOM_POS",
            CommandId::SetZoomPos => "CANON_USB_CONTROL_SET_ZOOM_POS",
            CommandId::GetAvailableShot => "CANON_USB_CONTROL_GET_AVAILABLE_SHOT",
            CommandId::GetCustomFunc => "CANON_USB_CONTROL_GET_CUSTOM_FUNC",
            CommandId::GetExtParamsSize => "CANON_USB_CONTROL_GET_EXT_PARAMS_SIZE",
            CommandId::GetExtParams => "CANON_USB_CONTROL_GET_EXT_PARAMS",
            CommandId::SetExtParams => "CANON_USB_CONTROL_SET_EXT_PARAMS",
            CommandId::Exit => "CANON_USB_CONTROL_EXIT",
            CommandId::Unknown1 => "CANON_USB_CONTROL_UNKNOWN_1",
            CommandId::Unknown2 => "CANON_USB_CONTROL_UNKNOWN_2",
            CommandId::ViewfinderStart => "CANON_USB_CONTROL_VIEWFINDER_START",
            CommandId::ViewfinderStop => "CANON_USB_CONTROL_VIEWFINDER_STOP",
            CommandId::SetCustomFunc => "CANON_USB_CONTROL_SET_CUSTOM_FUNC",
            CommandId::GetExtParamsVer => "CANON_USB_CONTROL_GET_EXT_PARAMS_VER",
            CommandId::SelectCamOutput => "CANON_USB_CONTROL_SELECT_CAM_OUTPUT",
            CommandId::DoAeAfAwb => "CANON_USB_CONTROL_DO_AE_AF_AWB",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a symbolic name, with or without the `CANON_USB_CONTROL_` prefix.
impl FromStr for CommandId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CommandId::ALL
            .iter()
            .copied()
            .find(|id| {
                let name = id.name();
                name.eq_ignore_ascii_case(wanted)
                    || name
                        .strip_prefix(NAME_PREFIX)
                        .map_or(false, |short| short.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

/// Raw table index, as found in foreign or deserialized input.
impl TryFrom<u8> for CommandId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CommandId::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| Error::UnknownCommand(format!("#{}", value)))
    }
}

/// Everything the protocol layer knows about one remote control subcommand.
///
/// An expected length of `0` means the length has not been captured from a
/// real device yet. It never means "zero bytes"; use [`request_contract`] and
/// [`reply_contract`] rather than reading the raw fields.
///
/// [`request_contract`]: CommandDescriptor::request_contract
/// [`reply_contract`]: CommandDescriptor::reply_contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub id: CommandId,
    pub label: &'static str,
    pub opcode: u32,
    pub expected_request_length: u32,
    pub expected_reply_length: u32,
    /// Request word sequences (subcode first) seen in USB captures.
    /// Not enforced by validation.
    pub observed_loads: &'static [&'static [u32]],
    pub note: Option<&'static str>,
}

impl CommandDescriptor {
    pub const fn new(
        id: CommandId,
        label: &'static str,
        opcode: u32,
        expected_request_length: u32,
        expected_reply_length: u32,
    ) -> Self {
        Self {
            id,
            label,
            opcode,
            expected_request_length,
            expected_reply_length,
            observed_loads: &[],
            note: None,
        }
    }

    pub const fn with_loads(mut self, loads: &'static [&'static [u32]]) -> Self {
        self.observed_loads = loads;
        self
    }

    pub const fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    pub fn request_contract(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.expected_request_length)
    }

    pub fn reply_contract(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.expected_reply_length)
    }

    /// True when neither direction has a captured length.
    pub fn is_unvalidated(&self) -> bool {
        self.request_contract().is_none() && self.reply_contract().is_none()
    }
}
