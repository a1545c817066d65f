//! # Digital-to-Analog Converter driver
//!
//! One driver covers both Pmod modules; they differ only in SPI mode,
//! resolution and the presence of a usable LDAC input. The host-side
//! bus must be configured with the matching mode constant ([`MODE_DA2`]
//! or [`MODE_DA3`]) before the driver is constructed.
//!
//! All calls block until the underlying bus transaction completes.
//! A driver exclusively owns its chip-select and latch lines for its
//! whole lifetime; the Pmod DA2's two converters sit behind one
//! chip-select and load the same frame, so they cannot be addressed
//! independently by any driver configuration.

use core::marker::PhantomData;

use crate::codec;
use crate::hal::blocking::spi::Write;
use crate::hal::digital::v2::OutputPin;
pub use crate::hal::spi::{Mode, Phase, Polarity};

/// SPI mode for the Pmod DA2 (mode 3).
pub const MODE_DA2: Mode = Mode {
    polarity: Polarity::IdleHigh,
    phase: Phase::CaptureOnSecondTransition,
};

/// SPI mode for the Pmod DA3 (mode 0).
pub const MODE_DA3: Mode = Mode {
    polarity: Polarity::IdleLow,
    phase: Phase::CaptureOnFirstTransition,
};

/// Bus clock rate in Hz known to work on both modules.
pub const DEFAULT_CLOCK: u32 = 1_000_000;

/// Capacity of the staging buffer batched writes are encoded into.
///
/// [`Config::chunk`] is clamped to this; a `Held` batch must fit in one
/// chunk, a `Chunked` batch goes out in chunk-sized bus writes.
pub const STAGE_BYTES: usize = 256;

/// DAC driver error
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Error<E, P> {
    /// The bus reported a failure mid-transfer.
    ///
    /// Not retried; after a batched write fails the converter's
    /// register contents are unspecified until the next full write
    /// succeeds.
    Transfer(E),
    /// The chip-select or latch line could not be driven.
    Pin(P),
    /// Operation attempted on a closed driver.
    Closed,
    /// Value exceeds the configured resolution under
    /// [`RangePolicy::Strict`].
    Value,
    /// A `Held` batch is longer than one bus transfer allows.
    ///
    /// Raised before any bus traffic; split the batch or use
    /// [`TransferDiscipline::Chunked`].
    Overrun,
}

/// Converter resolution.
///
/// The wire frame is 16 bits either way; resolution governs which
/// values are representable ([`RangePolicy`] decides what happens to
/// the rest).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 12-bit converters (Pmod DA2)
    Bits12,
    /// 16-bit converter (Pmod DA3)
    Bits16,
}

impl Resolution {
    /// Largest representable value.
    pub const fn max(self) -> u16 {
        match self {
            Resolution::Bits12 => 0x0FFF,
            Resolution::Bits16 => 0xFFFF,
        }
    }
}

/// What to do with values outside the configured resolution.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangePolicy {
    /// Keep the low bits, drop the rest.
    Mask,
    /// Reject the write with [`Error::Value`].
    Strict,
}

/// Whether the driver pulses the LDAC line around transfers.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LatchPolicy {
    /// No latch line; the converter updates on its own chip-select
    /// edge.
    Disabled,
    /// Latch line idles high, one low pulse after each transfer
    /// commits the shifted value.
    ActiveHigh,
}

/// Chip-select and latch behavior across a batched write.
///
/// The disciplines are not interchangeable: `PerValue` gives
/// per-sample latch precision at one bus transaction per sample, the
/// batch forms amortize chip-select and latch overhead across the
/// whole sequence and pulse the latch once at the end.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferDiscipline {
    /// Chip-select framed and latch pulsed per sample.
    PerValue,
    /// One chip-select frame, one bus write for the whole batch.
    ///
    /// The batch must fit in a single chunk ([`Config::chunk`]).
    Held,
    /// One chip-select frame, split into chunk-sized bus writes.
    ///
    /// Wire-equivalent to `Held` without its length limit.
    Chunked,
}

/// Driver configuration.
///
/// Replaces the scattered per-board constants with one explicit value;
/// bus parameters (clock, mode) stay with whoever owns the bus.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Config {
    /// Converter resolution.
    pub resolution: Resolution,
    /// Out-of-range value handling.
    pub range: RangePolicy,
    /// Upper bound, in bytes, on a single bus write during batched
    /// transfers. Clamped to [`STAGE_BYTES`] and forced even.
    pub chunk: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            resolution: Resolution::Bits16,
            range: RangePolicy::Mask,
            chunk: STAGE_BYTES,
        }
    }
}

impl Config {
    /// Defaults for the Pmod DA2.
    pub fn da2() -> Self {
        Config {
            resolution: Resolution::Bits12,
            ..Config::default()
        }
    }

    /// Defaults for the Pmod DA3.
    pub fn da3() -> Self {
        Config::default()
    }

    fn normalized(self) -> Self {
        Config {
            chunk: self.chunk.min(STAGE_BYTES).max(2) & !1,
            ..self
        }
    }
}

/// Stand-in latch line for modules wired without one.
///
/// Constructed internally by [`Dac::new`]; every operation succeeds
/// without touching hardware.
pub struct NoLatch<E> {
    _error: PhantomData<E>,
}

impl<E> OutputPin for NoLatch<E> {
    type Error = E;

    fn set_low(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), E> {
        Ok(())
    }
}

/// Pmod DA2/DA3 output driver.
///
/// Owns the write half of the bus, the chip-select line and, when
/// constructed with [`Dac::with_latch`], the LDAC line.
pub struct Dac<SPI, CS, LDAC> {
    spi: SPI,
    cs: CS,
    ldac: Option<LDAC>,
    config: Config,
    closed: bool,
}

impl<SPI, CS, E, P> Dac<SPI, CS, NoLatch<P>>
where
    SPI: Write<u8, Error = E>,
    CS: OutputPin<Error = P>,
{
    /// Claims the bus and chip-select line, latch disabled.
    ///
    /// Deasserts chip-select; the converter then updates on each
    /// transfer's own chip-select edge.
    pub fn new(spi: SPI, mut cs: CS, config: Config) -> Result<Self, Error<E, P>> {
        cs.set_high().map_err(Error::Pin)?;

        Ok(Dac {
            spi,
            cs,
            ldac: None,
            config: config.normalized(),
            closed: false,
        })
    }
}

impl<SPI, CS, LDAC, E, P> Dac<SPI, CS, LDAC>
where
    SPI: Write<u8, Error = E>,
    CS: OutputPin<Error = P>,
    LDAC: OutputPin<Error = P>,
{
    /// Claims the bus, chip-select and LDAC lines, latch active-high.
    ///
    /// Deasserts chip-select and parks the latch line low. Fails with
    /// [`Error::Pin`] if either line cannot be driven.
    pub fn with_latch(
        spi: SPI,
        mut cs: CS,
        mut ldac: LDAC,
        config: Config,
    ) -> Result<Self, Error<E, P>> {
        cs.set_high().map_err(Error::Pin)?;
        ldac.set_low().map_err(Error::Pin)?;

        Ok(Dac {
            spi,
            cs,
            ldac: Some(ldac),
            config: config.normalized(),
            closed: false,
        })
    }

    /// Outputs one sample.
    ///
    /// With a latch line: the line is raised before the transfer and
    /// pulsed low-then-high after it; that pulse commits the shifted
    /// value into the output register.
    pub fn write(&mut self, value: u16) -> Result<(), Error<E, P>> {
        self.ensure_open()?;

        let frame = codec::encode(self.admit(value)?);
        self.latch_deassert()?;
        self.shift(&frame)?;
        self.latch_commit()
    }

    /// Outputs an ordered sequence of samples under the given
    /// discipline.
    ///
    /// An empty sequence is a no-op: no bus traffic, no latch pulse.
    /// A `Held` batch is validated and staged in full before the bus
    /// is touched; if it cannot go out as one bus write the call fails
    /// with [`Error::Overrun`] and the converter is left untouched.
    pub fn write_all<I>(
        &mut self,
        values: I,
        discipline: TransferDiscipline,
    ) -> Result<(), Error<E, P>>
    where
        I: IntoIterator<Item = u16>,
    {
        self.ensure_open()?;

        match discipline {
            TransferDiscipline::PerValue => {
                for value in values {
                    self.write(value)?;
                }
                Ok(())
            }
            TransferDiscipline::Held => {
                let mut buf = [0u8; STAGE_BYTES];
                let mut len = 0;
                for value in values {
                    let word = self.admit(value)?;
                    if len + 2 > self.config.chunk {
                        return Err(Error::Overrun);
                    }
                    buf[len..len + 2].copy_from_slice(&codec::encode(word));
                    len += 2;
                }
                if len == 0 {
                    return Ok(());
                }

                self.latch_deassert()?;
                self.shift(&buf[..len])?;
                self.latch_commit()
            }
            TransferDiscipline::Chunked => {
                let mut values = values.into_iter();
                let mut buf = [0u8; STAGE_BYTES];

                // Stage before touching any line so an exhausted
                // sequence never opens a frame.
                let mut len = self.stage(&mut values, &mut buf)?;
                if len == 0 {
                    return Ok(());
                }

                self.latch_deassert()?;
                self.cs.set_low().map_err(Error::Pin)?;
                loop {
                    if let Err(e) = self.spi.write(&buf[..len]) {
                        let _ = self.cs.set_high();
                        return Err(Error::Transfer(e));
                    }
                    len = match self.stage(&mut values, &mut buf) {
                        Ok(n) => n,
                        Err(e) => {
                            let _ = self.cs.set_high();
                            return Err(e);
                        }
                    };
                    if len == 0 {
                        break;
                    }
                }
                self.cs.set_high().map_err(Error::Pin)?;
                self.latch_commit()
            }
        }
    }

    /// Releases the converter.
    ///
    /// Idempotent; the latch line is parked low. Further writes fail
    /// with [`Error::Closed`]. Use [`Dac::free`] to get the bus and
    /// pins back.
    pub fn close(&mut self) -> Result<(), Error<E, P>> {
        if self.closed {
            return Ok(());
        }
        if let Some(ldac) = &mut self.ldac {
            ldac.set_low().map_err(Error::Pin)?;
        }
        self.closed = true;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), Error<E, P>> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    fn admit(&self, value: u16) -> Result<u16, Error<E, P>> {
        let max = self.config.resolution.max();
        match self.config.range {
            RangePolicy::Mask => Ok(value & max),
            RangePolicy::Strict if value > max => Err(Error::Value),
            RangePolicy::Strict => Ok(value),
        }
    }

    /// Clocks `bytes` out inside a single chip-select frame.
    fn shift(&mut self, bytes: &[u8]) -> Result<(), Error<E, P>> {
        self.cs.set_low().map_err(Error::Pin)?;
        let res = self.spi.write(bytes).map_err(Error::Transfer);
        let cs = self.cs.set_high().map_err(Error::Pin);
        res?;
        cs
    }

    /// Encodes values into `buf` until the chunk limit or the end of
    /// the sequence. Returns the number of staged bytes.
    fn stage<I>(&self, values: &mut I, buf: &mut [u8; STAGE_BYTES]) -> Result<usize, Error<E, P>>
    where
        I: Iterator<Item = u16>,
    {
        let mut len = 0;
        while len + 2 <= self.config.chunk {
            match values.next() {
                Some(value) => {
                    let word = self.admit(value)?;
                    buf[len..len + 2].copy_from_slice(&codec::encode(word));
                    len += 2;
                }
                None => break,
            }
        }
        Ok(len)
    }

    fn latch_deassert(&mut self) -> Result<(), Error<E, P>> {
        if let Some(ldac) = &mut self.ldac {
            ldac.set_high().map_err(Error::Pin)?;
        }
        Ok(())
    }

    fn latch_commit(&mut self) -> Result<(), Error<E, P>> {
        if let Some(ldac) = &mut self.ldac {
            ldac.set_low().map_err(Error::Pin)?;
            ldac.set_high().map_err(Error::Pin)?;
        }
        Ok(())
    }
}

impl<SPI, CS, LDAC> Dac<SPI, CS, LDAC> {
    /// Latch behavior this driver was constructed with.
    pub fn latch_policy(&self) -> LatchPolicy {
        if self.ldac.is_some() {
            LatchPolicy::ActiveHigh
        } else {
            LatchPolicy::Disabled
        }
    }

    /// Whether [`Dac::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Releases the bus and associated pins.
    pub fn free(self) -> (SPI, CS, Option<LDAC>) {
        (self.spi, self.cs, self.ldac)
    }
}
