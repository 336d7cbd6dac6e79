use bytes::{Buf, BufMut, BytesMut};

// Remote release control rides on the CONTROL_CAMERA storage command
pub const CONTROL_CAMERA_CMD1: u8 = 0x13;
pub const CONTROL_CAMERA_CMD2: u8 = 0x12;
pub const CONTROL_CAMERA_CMD3: u32 = 0x201;

// 80 byte command block, payload follows
pub const COMMAND_BLOCK_LEN: usize = 0x50;

// size words count the payload plus this much
pub const REQUEST_SIZE_BIAS: usize = 0x10;

// every response starts with this, lengths in the table exclude it
pub const REPLY_HEADER_LEN: usize = 0x40;

pub const REPLY_LENGTH_OFFSET: usize = 0x48;
pub const REPLY_STATUS_OFFSET: usize = 0x50;

// enough to cover the status word
pub const MIN_REPLY_BODY: usize = REPLY_STATUS_OFFSET + 4 - REPLY_HEADER_LEN;

// remote control replies are under 0x60 bytes; anything past this is a corrupt length word
pub const MAX_REPLY_BODY: usize = 0x10000;

// largest single bulk-in request
pub const MAX_CHUNK_SIZE: usize = 0x1400;

const SERIAL_WRAP: u32 = 65530;

/// Little endian subcode followed by the argument words.
/// The first argument defaults to zero, like every captured load does.
pub fn encode_payload(opcode: u32, args: &[u32]) -> BytesMut {
    let words = 1 + args.len().max(1);
    let mut payload = BytesMut::with_capacity(words * 4);

    payload.put_u32_le(opcode);
    if args.is_empty() {
        payload.put_u32_le(0);
    }
    for arg in args {
        payload.put_u32_le(*arg);
    }

    payload
}

/// The value of the request size word for a payload of `payload_len` bytes.
pub fn request_size(payload_len: usize) -> usize {
    payload_len + REQUEST_SIZE_BIAS
}

pub fn command_block(payload: &[u8], serial: u32) -> BytesMut {
    let size = request_size(payload.len()) as u32;

    let mut block = BytesMut::with_capacity(COMMAND_BLOCK_LEN + payload.len());
    block.resize(COMMAND_BLOCK_LEN, 0);

    block[0..4].copy_from_slice(&size.to_le_bytes());
    block[4..8].copy_from_slice(&CONTROL_CAMERA_CMD3.to_le_bytes());
    block[0x40] = 0x02;
    block[0x44] = CONTROL_CAMERA_CMD1;
    block[0x47] = CONTROL_CAMERA_CMD2;
    block[0x48..0x4c].copy_from_slice(&size.to_le_bytes());

    let mut serial = serial.to_le_bytes();
    serial[2] = 0x12;
    block[0x4c..0x50].copy_from_slice(&serial);

    block.extend_from_slice(payload);
    block
}

/// Body length the camera declares in its reply, excluding the header.
pub fn reply_body_length(reply: &[u8]) -> Option<usize> {
    read_le32(reply, REPLY_LENGTH_OFFSET).map(|len| len as usize)
}

pub fn reply_status(reply: &[u8]) -> Option<u32> {
    read_le32(reply, REPLY_STATUS_OFFSET)
}

fn read_le32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4).map(|mut word| word.get_u32_le())
}

/// Command serial numbers, in the sequence the camera is used to seeing.
#[derive(Debug, Clone, Default)]
pub struct Serial {
    current: u32,
}

impl Serial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn next(&mut self) -> u32 {
        let step = match self.current % 8 {
            0 => 5,
            step => step,
        };
        self.current += step;
        if self.current > SERIAL_WRAP {
            self.current = 0;
        }
        self.current
    }
}
