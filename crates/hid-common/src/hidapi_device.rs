//! `hidapi` backed implementation of [`HidDevice`].

use crate::{HidCommonError, HidCommonResult, HidDevice, HidDeviceInfo};
use hidapi::HidApi;
use tracing::debug;

pub struct HidApiDevice {
    raw: Option<hidapi::HidDevice>,
    info: HidDeviceInfo,
}

impl HidApiDevice {
    /// Open the first interface matching `vendor_id:product_id`.
    pub fn open(api: &HidApi, vendor_id: u16, product_id: u16) -> HidCommonResult<Self> {
        let raw = api.open(vendor_id, product_id).map_err(|e| {
            HidCommonError::OpenError(format!("{vendor_id:04x}:{product_id:04x}: {e}"))
        })?;

        let info = match raw.get_device_info() {
            Ok(di) => HidDeviceInfo {
                vendor_id: di.vendor_id(),
                product_id: di.product_id(),
                release_number: di.release_number(),
                interface_number: di.interface_number(),
                serial_number: di.serial_number().map(str::to_string),
                manufacturer: di.manufacturer_string().map(str::to_string),
                product_name: di.product_string().map(str::to_string),
                path: di.path().to_string_lossy().into_owned(),
            },
            Err(e) => {
                debug!("device info unavailable for {vendor_id:04x}:{product_id:04x}: {e}");
                HidDeviceInfo::new(vendor_id, product_id, String::new())
            }
        };

        Ok(Self {
            raw: Some(raw),
            info,
        })
    }

    fn raw(&self) -> HidCommonResult<&hidapi::HidDevice> {
        self.raw.as_ref().ok_or(HidCommonError::Disconnected)
    }
}

impl HidDevice for HidApiDevice {
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> HidCommonResult<usize> {
        self.raw()?
            .read_timeout(buf, timeout_ms)
            .map_err(|e| HidCommonError::ReadError(e.to_string()))
    }

    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        self.raw()?
            .write(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))
    }

    fn device_info(&self) -> &HidDeviceInfo {
        &self.info
    }

    fn is_connected(&self) -> bool {
        self.raw.is_some()
    }

    fn close(&mut self) -> HidCommonResult<()> {
        // hidapi closes the handle on drop.
        self.raw = None;
        Ok(())
    }
}
