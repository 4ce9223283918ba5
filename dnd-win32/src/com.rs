//! Interface identities and status codes of the drop target protocol.

/// A COM interface identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const fn from_u128(uuid: u128) -> Self {
        Self {
            data1: (uuid >> 96) as u32,
            data2: ((uuid >> 80) & 0xffff) as u16,
            data3: ((uuid >> 64) & 0xffff) as u16,
            data4: (uuid as u64).to_be_bytes(),
        }
    }
}

pub const IID_IUNKNOWN: Guid = Guid::from_u128(0x00000000_0000_0000_c000_000000000046);

pub const IID_IDROP_TARGET: Guid = Guid::from_u128(0x00000122_0000_0000_c000_000000000046);

/// Outcome of a drop target callback, as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// `S_OK`.
    Ok,
    /// `E_NOTIMPL`: the window does not accept drags.
    NotImplemented,
    /// `E_UNEXPECTED`: the call does not fit the session state.
    Unexpected,
    /// `E_NOINTERFACE`.
    NoInterface,
    /// `E_INVALIDARG`.
    InvalidArg,
}

impl Status {
    /// The `HRESULT` the host expects.
    pub const fn hresult(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::NotImplemented => 0x8000_4001_u32 as i32,
            Status::Unexpected => 0x8000_ffff_u32 as i32,
            Status::NoInterface => 0x8000_4002_u32 as i32,
            Status::InvalidArg => 0x8007_0057_u32 as i32,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}
