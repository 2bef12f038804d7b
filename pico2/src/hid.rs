//! USB HID mouse presented to the host under test.

use defmt::{info, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, UsbDevice};
use m2p_latency::hal::InputInjector;
use m2p_pico2::board::{HID_POLL_MS, USB_MANUFACTURER, USB_PID, USB_PRODUCT, USB_VID};
use m2p_pico2::mouse::MouseState;
use static_cell::StaticCell;
use usbd_hid::descriptor::{MouseReport, SerializedDescriptor};

pub type UsbDriver = Driver<'static, USB>;

/// Largest report the mouse descriptor produces (buttons, x, y, wheel, pan).
const REPORT_SIZE: usize = 8;

const DESCRIPTOR_BUF_SIZE: usize = 256;

/// Build the USB device with a single HID mouse interface.
///
/// The returned device must be driven by [`usb_task`].
pub fn build(driver: UsbDriver) -> (UsbDevice<'static, UsbDriver>, UsbMouse) {
    let mut config = embassy_usb::Config::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER);
    config.product = Some(USB_PRODUCT);
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    static CONFIG_DESC: StaticCell<[u8; DESCRIPTOR_BUF_SIZE]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; DESCRIPTOR_BUF_SIZE]> = StaticCell::new();
    static MSOS_DESC: StaticCell<[u8; DESCRIPTOR_BUF_SIZE]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static HID_STATE: StaticCell<State> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        config,
        &mut CONFIG_DESC.init([0; DESCRIPTOR_BUF_SIZE])[..],
        &mut BOS_DESC.init([0; DESCRIPTOR_BUF_SIZE])[..],
        &mut MSOS_DESC.init([0; DESCRIPTOR_BUF_SIZE])[..],
        &mut CONTROL_BUF.init([0; 64])[..],
    );

    let hid_config = HidConfig {
        report_descriptor: MouseReport::desc(),
        request_handler: None,
        poll_ms: HID_POLL_MS,
        max_packet_size: REPORT_SIZE as u16,
    };
    let writer = HidWriter::new(&mut builder, HID_STATE.init(State::new()), hid_config);

    (
        builder.build(),
        UsbMouse {
            writer,
            state: MouseState::new(),
        },
    )
}

/// Runs the USB device state machine (enumeration, control requests).
#[embassy_executor::task]
pub async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! { usb.run().await }

/// [`InputInjector`] sending mouse reports on the HID interrupt endpoint.
pub struct UsbMouse {
    writer: HidWriter<'static, UsbDriver, REPORT_SIZE>,
    state: MouseState,
}

impl UsbMouse {
    async fn send(
        &mut self,
        report: MouseReport,
    ) {
        if self.writer.write_serialize(&report).await.is_err() {
            warn!("HID report dropped");
        }
    }
}

impl InputInjector for UsbMouse {
    async fn begin(&mut self) {
        // Blocks until the host has configured the interface.
        self.writer.ready().await;
        info!("HID mouse ready");
    }

    async fn end(&mut self) {
        let report = self.state.idle();
        self.send(report).await;
    }

    async fn press(&mut self) {
        let report = self.state.press();
        self.send(report).await;
    }

    async fn release(&mut self) {
        let report = self.state.release();
        self.send(report).await;
    }

    async fn click(&mut self) {
        self.press().await;
        self.release().await;
    }

    async fn move_by(
        &mut self,
        dx: i8,
        dy: i8,
    ) {
        let report = self.state.motion(dx, dy);
        self.send(report).await;
    }
}
