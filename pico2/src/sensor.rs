//! Photosensor on ADC0 (GPIO26).

use defmt::warn;
use embassy_rp::adc::{Adc, Async, Channel};
use m2p_latency::hal::SensorSampler;

/// 12-bit conversions of the photosensor voltage.
pub struct AdcSensor {
    adc: Adc<'static, Async>,
    channel: Channel<'static>,
    last: u16,
}

impl AdcSensor {
    pub fn new(
        adc: Adc<'static, Async>,
        channel: Channel<'static>,
    ) -> Self {
        Self { adc, channel, last: 0 }
    }
}

impl SensorSampler for AdcSensor {
    async fn read(&mut self) -> u16 {
        match self.adc.read(&mut self.channel).await {
            Ok(value) => {
                self.last = value;
                value
            }
            Err(_) => {
                // A failed conversion repeats the previous value, which can never cross the threshold.
                warn!("ADC conversion failed");
                self.last
            }
        }
    }
}
