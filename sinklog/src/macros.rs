//! Format-args convenience for [`Logger::submit`](crate::Logger::submit).

/// Submit a formatted message to a logger.
///
/// Expands to `logger.submit(severity, format_args!(...))` and returns its result.
///
/// ```
/// use sinklog::{sinklog, Logger, Settings, Severity};
///
/// let logger = Logger::new(Settings::new()).unwrap();
/// let status = sinklog!(logger, Severity::Notice, "disk at {}%", 91).unwrap();
/// assert_eq!(status, 0);
/// ```
#[macro_export]
macro_rules! sinklog {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.submit($severity, format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::{Logger, Settings, Severity, Sink};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_macro_forwards_format_args() {
        let seen = Arc::new(Mutex::new(None));
        let sink_seen = Arc::clone(&seen);
        let mut logger = Logger::new(Settings::new()).unwrap();
        logger
            .add_sink(Sink::with_severity(move |sev, text| {
                *sink_seen.lock().unwrap() = Some((sev, text.to_string()));
                0
            }))
            .unwrap();

        let rc = sinklog!(logger, Severity::Critical, "{} of {}", 3, 4).unwrap();
        assert_eq!(rc, 0);
        assert_eq!(
            *seen.lock().unwrap(),
            Some((Severity::Critical, "3 of 4".to_string()))
        );
    }
}
