//! Command registry and transfer validation for the Canon USB remote release
//! control protocol, plus a small dispatcher that runs those commands over
//! libusb.

pub mod command;
pub mod control;
mod error;
pub mod registry;
pub mod validate;

use rusb::{Context, UsbContext};

pub use command::{CommandDescriptor, CommandId};
pub use control::usb::{UsbTransport, CANON_VENDOR_ID, POWERSHOT_G3_PRODUCT_ID};
pub use control::{ControlTransport, LengthPolicy, RemoteControl, Reply};
pub use error::Error;
pub use registry::{build_registry, Registry};
pub use validate::{validate_reply, validate_request, Direction, Outcome};

/// Opens the first PowerShot G3 found on the bus.
pub fn connect() -> Result<RemoteControl<UsbTransport<Context>>, Error> {
    let mut context = Context::new()?;
    connect_with(&mut context, CANON_VENDOR_ID, POWERSHOT_G3_PRODUCT_ID)
}

/// Opens the camera with the given ids on an existing libusb context.
pub fn connect_with<T: UsbContext>(
    context: &mut T,
    vid: u16,
    pid: u16,
) -> Result<RemoteControl<UsbTransport<T>>, Error> {
    let transport = UsbTransport::open(context, vid, pid)?;
    Ok(RemoteControl::new(transport))
}
