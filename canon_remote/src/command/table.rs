use super::{CommandDescriptor, CommandId};

// Lengths are taken from USB captures.
// Request length counts the request size word: payload words + 0x10.
// Reply length excludes the 0x40 byte response header.
// 0 = not captured yet.

pub(crate) const COMMAND_TABLE: &[CommandDescriptor] = &[
    // id, description, value, cmd len, reply len
    CommandDescriptor::new(CommandId::Init, "Camera control init", 0x00, 0x18, 0x1c)
        .with_loads(&[&[0x00, 0x00]]),
    CommandDescriptor::new(CommandId::ShutterRelease, "Release shutter", 0x04, 0x18, 0x1c)
        .with_loads(&[&[0x04, 0x00]]),
    CommandDescriptor::new(CommandId::SetParams, "Set release params", 0x07, 0x3c, 0x1c)
        .with_note("request layout unknown"),
    CommandDescriptor::new(CommandId::SetTransferMode, "Set transfer mode", 0x09, 0x1c, 0x1c)
        .with_loads(&[&[0x09, 0x04, 0x03], &[0x09, 0x04, 0x0200_0003]]),
    CommandDescriptor::new(CommandId::GetParams, "Get release params", 0x0a, 0x18, 0x4c)
        .with_loads(&[&[0x0a, 0x00]]),
    CommandDescriptor::new(CommandId::GetZoomPos, "Get zoom position", 0x0b, 0x18, 0x20)
        .with_loads(&[&[0x0b, 0x00]]),
    CommandDescriptor::new(CommandId::SetZoomPos, "Set zoom position", 0x0c, 0x1c, 0x1c)
        .with_loads(&[
            &[0x0c, 0x04, 0x01],
            &[0x0c, 0x04, 0x0b],
            &[0x0c, 0x04, 0x0a],
            &[0x0c, 0x04, 0x09],
            &[0x0c, 0x04, 0x08],
            &[0x0c, 0x04, 0x07],
            &[0x0c, 0x04, 0x06],
            &[0x0c, 0x04, 0x00],
        ]),
    CommandDescriptor::new(CommandId::GetAvailableShot, "Get available shot", 0x0d, 0x18, 0x20),
    CommandDescriptor::new(CommandId::GetCustomFunc, "Get custom func.", 0x0f, 0x22, 0x26),
    CommandDescriptor::new(
        CommandId::GetExtParamsSize,
        "Get ext. release params size",
        0x10,
        0x1c,
        0x20,
    )
    .with_loads(&[&[0x10, 0x00]])
    .with_note("captured load is two words, short of the request length"),
    CommandDescriptor::new(CommandId::GetExtParams, "Get ext. release params", 0x12, 0x1c, 0x2c)
        .with_loads(&[&[0x12, 0x04, 0x10]]),
    CommandDescriptor::new(CommandId::SetExtParams, "Set extended params", 0x13, 0x15, 0x1c)
        .with_note("based on EOS 20D"),
    CommandDescriptor::new(CommandId::Exit, "Exit release control", 0x01, 0x18, 0x1c),
    // new protocol subcodes
    CommandDescriptor::new(CommandId::Unknown1, "Unknown remote subcode", 0x1b, 0x08, 0x5e),
    CommandDescriptor::new(CommandId::Unknown2, "Unknown remote subcode", 0x1c, 0x00, 0x00),
    // in the Canon header defines, need more usb snoops to get reply lengths
    CommandDescriptor::new(CommandId::ViewfinderStart, "Start viewfinder", 0x02, 0x00, 0x00),
    CommandDescriptor::new(CommandId::ViewfinderStop, "Stop viewfinder", 0x03, 0x00, 0x00),
    CommandDescriptor::new(CommandId::SetCustomFunc, "Set custom func.", 0x0e, 0x00, 0x00),
    CommandDescriptor::new(
        CommandId::GetExtParamsVer,
        "Get extended params version",
        0x11,
        0x00,
        0x00,
    ),
    CommandDescriptor::new(CommandId::SelectCamOutput, "Select camera output", 0x14, 0x00, 0x00)
        .with_note("LCD (0x1), video out (0x2) or off (0x3)"),
    CommandDescriptor::new(CommandId::DoAeAfAwb, "Do AE, AF, and AWB", 0x15, 0x00, 0x00),
];
