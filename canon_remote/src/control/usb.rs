use std::time::Duration;

use bytes::BytesMut;
use log::{debug, info};
use rusb::{DeviceHandle, Direction, Recipient, RequestType, UsbContext};
use simple_error::SimpleError;

use super::ControlTransport;
use crate::error::Error;

pub const CANON_VENDOR_ID: u16 = 0x04a9;
pub const POWERSHOT_G3_PRODUCT_ID: u16 = 0x306e;

const BULK_IN_ENDPOINT: u8 = 0x81;

// bRequest is 0x04 when more than one byte is written, 0x0c otherwise
const REQUEST_LONG: u8 = 0x04;
const REQUEST_SHORT: u8 = 0x0c;

/// [`ControlTransport`] over a claimed libusb device handle.
pub struct UsbTransport<T: UsbContext> {
    handle: DeviceHandle<T>,
    timeout: Duration,
}

impl<T: UsbContext> UsbTransport<T> {
    /// Finds the camera by vendor/product id, opens it and claims interface 0.
    pub fn open(context: &mut T, vid: u16, pid: u16) -> Result<Self, Error> {
        match open_device(context, vid, pid)? {
            Some(handle) => {
                info!("Opened camera {:04x}:{:04x}", vid, pid);
                handle.claim_interface(0)?;
                Ok(Self::from_handle(handle))
            }
            None => Err(SimpleError::new(format!(
                "could not find camera {:04x}:{:04x}",
                vid, pid
            ))
            .into()),
        }
    }

    pub fn from_handle(handle: DeviceHandle<T>) -> Self {
        Self {
            handle,
            timeout: Duration::from_secs(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn handle(&self) -> &DeviceHandle<T> {
        &self.handle
    }
}

impl<T: UsbContext> ControlTransport for UsbTransport<T> {
    fn control_write(&mut self, value: u16, data: &[u8]) -> Result<usize, Error> {
        let request_type =
            rusb::request_type(Direction::Out, RequestType::Vendor, Recipient::Device);
        let request = if data.len() > 1 {
            REQUEST_LONG
        } else {
            REQUEST_SHORT
        };

        debug!(
            "CTRL OUT (req: 0x{:x} wValue: 0x{:x}) 0x{:x} bytes",
            request,
            value,
            data.len()
        );

        Ok(self
            .handle
            .write_control(request_type, request, value, 0, data, self.timeout)?)
    }

    fn bulk_read(&mut self, len: usize) -> Result<BytesMut, Error> {
        let mut buf = BytesMut::with_capacity(len);
        buf.resize(len, 0);

        let read = self
            .handle
            .read_bulk(BULK_IN_ENDPOINT, &mut buf, self.timeout)?;
        buf.truncate(read);

        debug!("bulk in got 0x{:x} of 0x{:x} bytes", read, len);
        Ok(buf)
    }
}

fn open_device<T: UsbContext>(
    context: &mut T,
    vid: u16,
    pid: u16,
) -> Result<Option<DeviceHandle<T>>, Error> {
    for device in context.devices()?.iter() {
        let device_desc = match device.device_descriptor() {
            Ok(d) => d,
            Err(_) => continue,
        };

        if device_desc.vendor_id() == vid && device_desc.product_id() == pid {
            return Ok(Some(device.open()?));
        }
    }

    Ok(None)
}
