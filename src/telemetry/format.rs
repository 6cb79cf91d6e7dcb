//! Fixed-point decimal rendering for report fields

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

/// Millivolts shown as volts, `W.FFF`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Millivolts(pub u32);

/// Milliamps shown as signed amps, `+W.FFF` / `-W.FFF`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milliamps(pub i32);

/// Tenths of a degree shown as `D.F`, `-D.F` below zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeciCelsius(pub i16);

/// 1-based cell number, right-aligned to two columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellNumber(pub usize);

fn thousandths<W>(f: &mut Formatter<'_, W>, value: u32) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    let frac = value % 1000;
    uwrite!(f, "{}.{}{}{}", value / 1000, frac / 100, frac / 10 % 10, frac % 10)
}

impl uDisplay for Millivolts {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        thousandths(f, self.0)
    }
}

impl uDisplay for Milliamps {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(if self.0 < 0 { "-" } else { "+" })?;
        thousandths(f, self.0.unsigned_abs())
    }
}

impl uDisplay for DeciCelsius {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let tenths = self.0.unsigned_abs();
        uwrite!(f, "{}.{}", tenths / 10, tenths % 10)
    }
}

impl uDisplay for CellNumber {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        if self.0 < 10 {
            f.write_str(" ")?;
        }
        uwrite!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<T: uDisplay>(value: T) -> String {
        let mut out = String::new();
        uwrite!(out, "{}", value).unwrap();
        out
    }

    #[test]
    fn millivolts_split_into_volts() {
        assert_eq!(render(Millivolts(13205)), "13.205");
        assert_eq!(render(Millivolts(3300)), "3.300");
        assert_eq!(render(Millivolts(3005)), "3.005");
        assert_eq!(render(Millivolts(42)), "0.042");
        assert_eq!(render(Millivolts(0)), "0.000");
    }

    #[test]
    fn millivolts_render_back_to_the_same_integer() {
        for mv in [0u32, 1, 999, 1000, 2501, 3300, 4199, 65535] {
            let text = render(Millivolts(mv));
            let (whole, frac) = text.split_once('.').unwrap();
            assert_eq!(frac.len(), 3);
            let parsed: u32 = whole.parse::<u32>().unwrap() * 1000 + frac.parse::<u32>().unwrap();
            assert_eq!(parsed, mv);
        }
    }

    #[test]
    fn current_always_carries_a_sign() {
        assert_eq!(render(Milliamps(-1500)), "-1.500");
        assert_eq!(render(Milliamps(2250)), "+2.250");
        assert_eq!(render(Milliamps(0)), "+0.000");
        assert_eq!(render(Milliamps(-500)), "-0.500");
        assert_eq!(render(Milliamps(i32::MIN)), "-2147483.648");
    }

    #[test]
    fn temperature_has_one_decimal() {
        assert_eq!(render(DeciCelsius(253)), "25.3");
        assert_eq!(render(DeciCelsius(250)), "25.0");
        assert_eq!(render(DeciCelsius(-105)), "-10.5");
        assert_eq!(render(DeciCelsius(-5)), "-0.5");
    }

    #[test]
    fn cell_number_is_padded_to_two_columns() {
        assert_eq!(render(CellNumber(1)), " 1");
        assert_eq!(render(CellNumber(16)), "16");
    }
}
