//! Default endpoint switching via the PolicyConfig COM class.
//!
//! The public MMDevice API can only read the default endpoint; changing it
//! goes through `IPolicyConfig`, an undocumented but long-stable interface
//! reached by its well-known CLSID/IID. Everything else in the crate talks
//! to it only through [`DefaultEndpointSetter`].

use super::device::{AudioError, DefaultEndpointSetter, DeviceRole};
use windows::core::{GUID, HRESULT, PCWSTR};
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};
use windows_core::IUnknown;

/// IPolicyConfig COM interface (undocumented but stable).
///
/// Only `SetDefaultEndpoint` is used; the reserved methods exist solely to
/// keep the vtable layout intact.
#[windows::core::interface("F8679F50-850A-41CF-9C72-430F290290C8")]
pub unsafe trait IPolicyConfig: IUnknown {
    fn reserved1(&self) -> HRESULT;
    fn reserved2(&self) -> HRESULT;
    fn reserved3(&self) -> HRESULT;
    fn reserved4(&self) -> HRESULT;
    fn reserved5(&self) -> HRESULT;
    fn reserved6(&self) -> HRESULT;
    fn reserved7(&self) -> HRESULT;
    fn reserved8(&self) -> HRESULT;
    fn reserved9(&self) -> HRESULT;
    fn reserved10(&self) -> HRESULT;

    fn SetDefaultEndpoint(&self, device_id: PCWSTR, role: u32) -> HRESULT;
}

// PolicyConfigClient CLSID
const CLSID_POLICY_CONFIG_CLIENT: GUID = GUID::from_u128(0x870af99c_171d_4f9e_af0d_e63df40c2bc9);

/// [`DefaultEndpointSetter`] backed by the PolicyConfig class.
///
/// The COM object is instantiated per call and released on return. If the
/// class cannot be instantiated (the contract moved out from under us), the
/// error propagates to the role fan-out, which swallows it: switching
/// degrades to a no-op rather than a crash.
pub struct PolicyConfigClient;

impl PolicyConfigClient {
    fn open() -> Result<IPolicyConfig, AudioError> {
        unsafe {
            CoCreateInstance(&CLSID_POLICY_CONFIG_CLIENT, None, CLSCTX_ALL)
                .map_err(AudioError::PolicyUnavailable)
        }
    }
}

impl DefaultEndpointSetter for PolicyConfigClient {
    fn set_default_endpoint(&self, device_id: &str, role: DeviceRole) -> Result<(), AudioError> {
        unsafe {
            let policy = Self::open()?;

            let device_id_wide: Vec<u16> =
                device_id.encode_utf16().chain(std::iter::once(0)).collect();

            policy
                .SetDefaultEndpoint(PCWSTR(device_id_wide.as_ptr()), role as u32)
                .ok()
                .map_err(AudioError::SetDefaultFailed)
        }
    }
}
