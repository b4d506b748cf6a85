//! HID device traits

use crate::{HidCommonError, HidCommonResult, HidDeviceInfo};

/// An opened HID interface.
///
/// Reads fill a caller-owned buffer so the poll loop stays allocation-free.
/// A read returning `Ok(0)` means no report was pending within the timeout.
pub trait HidDevice: Send {
    /// Read one input report into `buf`, waiting at most `timeout_ms`
    /// milliseconds (`0` = non-blocking, `-1` = block).
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> HidCommonResult<usize>;

    /// Write one output report, returning the number of bytes accepted.
    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;

    fn device_info(&self) -> &HidDeviceInfo;

    fn is_connected(&self) -> bool;

    fn close(&mut self) -> HidCommonResult<()>;
}

impl<D: HidDevice + ?Sized> HidDevice for Box<D> {
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> HidCommonResult<usize> {
        (**self).read_report(buf, timeout_ms)
    }

    fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        (**self).write_report(data)
    }

    fn device_info(&self) -> &HidDeviceInfo {
        (**self).device_info()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn close(&mut self) -> HidCommonResult<()> {
        (**self).close()
    }
}

pub mod mock {
    //! In-memory device for tests and capture replay.
    //!
    //! Clones share their queues, so a test can keep a handle while the
    //! driver owns another.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    type ReadQueue = VecDeque<Result<Vec<u8>, String>>;

    #[derive(Debug, Default)]
    struct WriteBehavior {
        /// Accept at most this many bytes per write.
        limit: Option<usize>,
        /// Fail every write with this message.
        failure: Option<String>,
    }

    #[derive(Clone)]
    pub struct MockHidDevice {
        info: HidDeviceInfo,
        read_queue: Arc<Mutex<ReadQueue>>,
        write_history: Arc<Mutex<Vec<Vec<u8>>>>,
        write_behavior: Arc<Mutex<WriteBehavior>>,
        connected: Arc<Mutex<bool>>,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    impl MockHidDevice {
        pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
            Self::with_info(HidDeviceInfo::new(vendor_id, product_id, path))
        }

        pub fn with_info(info: HidDeviceInfo) -> Self {
            Self {
                info,
                read_queue: Arc::new(Mutex::new(VecDeque::new())),
                write_history: Arc::new(Mutex::new(Vec::new())),
                write_behavior: Arc::new(Mutex::new(WriteBehavior::default())),
                connected: Arc::new(Mutex::new(true)),
            }
        }

        pub fn queue_read(&self, data: impl Into<Vec<u8>>) {
            lock(&self.read_queue).push_back(Ok(data.into()));
        }

        /// The next read after the already-queued reports fails.
        pub fn queue_read_error(&self, message: impl Into<String>) {
            lock(&self.read_queue).push_back(Err(message.into()));
        }

        pub fn pending_reads(&self) -> usize {
            lock(&self.read_queue).len()
        }

        pub fn get_write_history(&self) -> Vec<Vec<u8>> {
            lock(&self.write_history).clone()
        }

        pub fn clear_write_history(&self) {
            lock(&self.write_history).clear();
        }

        /// Accept at most `limit` bytes per write, simulating short writes.
        pub fn set_write_limit(&self, limit: Option<usize>) {
            lock(&self.write_behavior).limit = limit;
        }

        pub fn fail_writes(&self, message: Option<String>) {
            lock(&self.write_behavior).failure = message;
        }

        pub fn disconnect(&self) {
            *lock(&self.connected) = false;
        }

        pub fn reconnect(&self) {
            *lock(&self.connected) = true;
        }
    }

    impl HidDevice for MockHidDevice {
        fn read_report(&mut self, buf: &mut [u8], _timeout_ms: i32) -> HidCommonResult<usize> {
            if !*lock(&self.connected) {
                return Err(HidCommonError::Disconnected);
            }

            match lock(&self.read_queue).pop_front() {
                None => Ok(0),
                Some(Err(message)) => Err(HidCommonError::ReadError(message)),
                Some(Ok(data)) => {
                    let n = data.len().min(buf.len());
                    if let (Some(dst), Some(src)) = (buf.get_mut(..n), data.get(..n)) {
                        dst.copy_from_slice(src);
                    }
                    Ok(n)
                }
            }
        }

        fn write_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
            if !*lock(&self.connected) {
                return Err(HidCommonError::Disconnected);
            }

            let behavior = lock(&self.write_behavior);
            if let Some(message) = &behavior.failure {
                return Err(HidCommonError::WriteError(message.clone()));
            }

            lock(&self.write_history).push(data.to_vec());
            Ok(behavior.limit.map_or(data.len(), |limit| limit.min(data.len())))
        }

        fn device_info(&self) -> &HidDeviceInfo {
            &self.info
        }

        fn is_connected(&self) -> bool {
            *lock(&self.connected)
        }

        fn close(&mut self) -> HidCommonResult<()> {
            self.disconnect();
            Ok(())
        }
    }
}
