use std::ffi::OsString;
#[cfg(target_os = "windows")]
use std::ffi::OsStr;
#[cfg(target_os = "windows")]
use std::iter::once;
#[cfg(target_os = "windows")]
use std::os::windows::prelude::{OsStrExt, OsStringExt};

#[cfg(target_os = "windows")]
pub fn encode_wide(string: impl AsRef<OsStr>) -> Vec<u16> {
    string.as_ref().encode_wide().chain(once(0)).collect()
}

pub fn decode_wide(mut wide_c_string: &[u16]) -> OsString {
    if let Some(null_pos) = wide_c_string.iter().position(|c| *c == 0) {
        wide_c_string = &wide_c_string[..null_pos];
    }

    #[cfg(target_os = "windows")]
    {
        OsString::from_wide(wide_c_string)
    }
    #[cfg(not(target_os = "windows"))]
    {
        String::from_utf16_lossy(wide_c_string).into()
    }
}
