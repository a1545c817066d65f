/*!
 # Digilent Pmod DA2 / Pmod DA3 driver

   Platform-agnostic driver for the Digilent Pmod DA2 and Pmod DA3
   digital-to-analog converter modules, built on the [`embedded-hal`]
   traits. The host owns and configures the SPI bus; this crate owns the
   chip-select line, the wire format and the LDAC latch sequencing.

   Both modules shift a 16-bit frame per sample, most significant byte
   first. The Pmod DA2 carries two 12-bit converters behind a single
   chip-select (they cannot be addressed independently), the Pmod DA3 a
   single 16-bit converter with an LDAC input that commits the shifted
   value into the output register.

   Configure the bus with the mode constant for your module
   ([`dac::MODE_DA2`] or [`dac::MODE_DA3`]) and a clock rate the module
   accepts ([`dac::DEFAULT_CLOCK`] is a safe bench default).

   ## Example

   Sweep a Pmod DA3 on a Raspberry Pi, committing each sample with the
   LDAC line:

   ```no_run
   use linux_embedded_hal::{Pin, Spidev};
   use pmod_dac::dac::{Config, Dac, TransferDiscipline};
   use pmod_dac::waveform::Waveform;

   let spi = Spidev::open("/dev/spidev0.1").unwrap();
   let cs = Pin::new(26);
   let ldac = Pin::new(11);

   let mut dac = Dac::with_latch(spi, cs, ldac, Config::da3()).unwrap();

   // One sample, committed by a single LDAC pulse.
   dac.write(0x7FFF).unwrap();

   // A full-scale ramp, streamed in chunked bursts.
   let ramp = Waveform::ramp(0, 65500, 100).unwrap();
   dac.write_all(ramp.iter(), TransferDiscipline::Chunked).unwrap();

   dac.close().unwrap();
   ```

   [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal
*/
#![no_std]
#![warn(missing_docs)]

pub use embedded_hal as hal;

pub mod codec;
pub mod dac;
pub mod waveform;
