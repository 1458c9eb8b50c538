/*++

Licensed under the Apache-2.0 license.

File Name:

    printer.rs

Abstract:

    File contains support routines and macros to print to the debug UART

--*/
use core::convert::Infallible;
use ufmt::{uDisplay, uWrite};

#[derive(Default)]
pub struct Printer;

impl uWrite for Printer {
    type Error = Infallible;

    /// Writes a string slice into this writer, returning whether the write succeeded.
    #[cfg(not(feature = "std"))]
    #[inline(never)]
    fn write_str(&mut self, _str: &str) -> Result<(), Self::Error> {
        #[cfg(feature = "uart")]
        crate::Uart::default().write(_str);
        Ok(())
    }

    /// Writes a string slice into this writer, returning whether the write succeeded.
    #[cfg(feature = "std")]
    fn write_str(&mut self, str: &str) -> Result<(), Self::Error> {
        print!("{str}");
        Ok(())
    }
}

#[macro_export]
macro_rules! cprintln {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwriteln!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

/// Prints words as contiguous upper case hex.
pub struct HexWords<'a>(pub &'a [u32]);
impl uDisplay for HexWords<'_> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        for word in self.0.iter() {
            for byte in word.to_be_bytes() {
                for c in [byte >> 4, byte & 0xf] {
                    if c < 10 {
                        f.write_char((c + b'0') as char)?;
                    } else {
                        f.write_char((c - 10 + b'A') as char)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Buf(std::string::String);

    impl uWrite for Buf {
        type Error = Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn test_hex_words() {
        let mut buf = Buf(std::string::String::new());
        ufmt::uwrite!(&mut buf, "{}", HexWords(&[0x0123_abcd, 0xf])).unwrap();
        assert_eq!(buf.0, "0123ABCD0000000F");
    }
}
