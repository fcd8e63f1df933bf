use std::str::FromStr;

/// Parse a quantity with units, such as `"0.5 °"`, from the command line
pub fn parse_uom<T>(s: &str) -> Result<T, String>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    s.parse().map_err(|e| format!("`{s}`: {e}"))
}

/// Group numeric digits to facilitate reading long numbers
pub fn group_digits<F: std::fmt::Display>(n: F) -> String {
    use numsep::{separate, Locale};
    separate(n, Locale::English)
}


pub mod timing {

    use super::group_digits;
    use std::time::Instant;
    use std::io::Write;

    /// Wall-clock reporting of consecutive stages on stdout
    pub struct Progress {
        previous: Instant,
    }

    impl Progress {

        #[allow(clippy::new_without_default)]
        pub fn new() -> Self { Self { previous: Instant::now() } }

        /// Print message, append ellipsis, flush stdout, stay on same line, start timer.
        pub fn start(&mut self, message: &str) {
            print!("{message} ... ");
            let _ = std::io::stdout().flush();
            self.start_timer();
        }

        // Print time elapsed since last start or done
        pub fn done(&mut self) {
            println!("{} ms", group_digits(self.previous.elapsed().as_millis()));
            self.start_timer();
        }

        // Print message followed by time elapsed since last start or done
        pub fn done_with_message(&mut self, message: &str) {
            println!("{message}: {} ms",
                     group_digits(self.previous.elapsed().as_millis()));
            self.start_timer();
        }

        fn start_timer(&mut self) { self.previous = Instant::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use units::{degree_, mm_, Angle, Length};

    #[rstest(/**/ n,           expected,
             case(0,           "0"),
             case(999,         "999"),
             case(1000,        "1,000"),
             case(262_144,     "262,144"),
             case(16_777_216,  "16,777,216"),
    )]
    fn digits_are_grouped(n: u64, expected: &str) {
        assert_eq!(group_digits(n), expected);
    }

    #[test]
    fn quantities_parse_with_units() {
        let l: Length = parse_uom("2 cm").unwrap();
        let a: Angle  = parse_uom("90 °").unwrap();
        float_eq::assert_float_eq!(mm_(l), 20.0, ulps <= 2);
        float_eq::assert_float_eq!(degree_(a), 90.0, ulps <= 2);
        assert!(parse_uom::<Length>("2").is_err());
    }
}
