//! Serial link adapter — both UART channels behind the link ports.
//!
//! Channel A (display) is half-duplex: outbound sign frames plus the
//! inbound capacity-reset command.  Channel B (telemetry) is outbound
//! only.  Both run 9600 baud 8N1.
//!
//! On ESP-IDF the adapter owns two `UartDriver`s built in `main` (where
//! peripheral ownership is established).  On host/test it records written
//! frames and replays queued inbound bytes.

use crate::app::ports::{DisplayLink, LinkError, TelemetryLink};

#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
use esp_idf_hal::delay::NON_BLOCK;
#[cfg(target_os = "espidf")]
use esp_idf_hal::uart::UartDriver;

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

pub struct SerialLinks {
    #[cfg(target_os = "espidf")]
    display: UartDriver<'static>,
    #[cfg(target_os = "espidf")]
    telemetry: UartDriver<'static>,

    #[cfg(not(target_os = "espidf"))]
    display_sent: Vec<Vec<u8>>,
    #[cfg(not(target_os = "espidf"))]
    telemetry_sent: Vec<Vec<u8>>,
    #[cfg(not(target_os = "espidf"))]
    inbound: VecDeque<u8>,
}

impl SerialLinks {
    #[cfg(target_os = "espidf")]
    pub fn new(display: UartDriver<'static>, telemetry: UartDriver<'static>) -> Self {
        Self { display, telemetry }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        log::info!("SerialLinks: simulation backend");
        Self {
            display_sent: Vec::new(),
            telemetry_sent: Vec::new(),
            inbound: VecDeque::new(),
        }
    }

    /// Queue bytes on the simulated inbound side of the display link.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_push_inbound(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    /// Frames written to the simulated display link so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_display_sent(&self) -> &[Vec<u8>] {
        &self.display_sent
    }

    /// Frames written to the simulated telemetry link so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_telemetry_sent(&self) -> &[Vec<u8>] {
        &self.telemetry_sent
    }

    /// Push a full buffer out one UART, retrying partial writes.
    #[cfg(target_os = "espidf")]
    fn write_all(uart: &mut UartDriver<'static>, mut data: &[u8]) -> Result<(), LinkError> {
        while !data.is_empty() {
            match uart.write(data) {
                Ok(0) | Err(_) => return Err(LinkError::WriteFailed),
                Ok(n) => data = &data[n..],
            }
        }
        Ok(())
    }
}

impl DisplayLink for SerialLinks {
    #[cfg(target_os = "espidf")]
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        Self::write_all(&mut self.display, frame)
    }

    #[cfg(not(target_os = "espidf"))]
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.display_sent.push(frame.to_vec());
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn read_pending(&mut self, buf: &mut [u8]) -> usize {
        match self.display.read(buf, NON_BLOCK) {
            Ok(n) => n,
            Err(e) => {
                warn!("Display UART read failed: {}", e);
                0
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_pending(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.inbound.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }
}

impl TelemetryLink for SerialLinks {
    #[cfg(target_os = "espidf")]
    fn send_status(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        Self::write_all(&mut self.telemetry, frame)
    }

    #[cfg(not(target_os = "espidf"))]
    fn send_status(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.telemetry_sent.push(frame.to_vec());
        Ok(())
    }
}
