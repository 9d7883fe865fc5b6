use super::model::LogFormat;

/// Line counters for one run, reported when the input ends.
///
/// Processing is single-threaded, so plain integers are enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: u64,
    pub json: u64,
    pub access_log: u64,
    pub console: u64,
    pub unparseable: u64,
}

impl ParseStats {
    pub fn record_parsed(&mut self, format: LogFormat) {
        self.lines += 1;
        match format {
            LogFormat::Json => self.json += 1,
            LogFormat::AccessLog => self.access_log += 1,
            LogFormat::Console => self.console += 1,
        }
    }

    pub fn record_unparseable(&mut self) {
        self.lines += 1;
        self.unparseable += 1;
    }

    pub fn parsed(&self) -> u64 {
        self.json + self.access_log + self.console
    }

    /// Share of lines some parser accepted, 0.0 when nothing was read.
    pub fn parse_rate(&self) -> f64 {
        if self.lines == 0 {
            0.0
        } else {
            self.parsed() as f64 / self.lines as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_format() {
        let mut stats = ParseStats::default();
        stats.record_parsed(LogFormat::Json);
        stats.record_parsed(LogFormat::Json);
        stats.record_parsed(LogFormat::Console);
        stats.record_unparseable();

        assert_eq!(stats.lines, 4);
        assert_eq!(stats.json, 2);
        assert_eq!(stats.console, 1);
        assert_eq!(stats.access_log, 0);
        assert_eq!(stats.parsed(), 3);
        assert!((stats.parse_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_rate() {
        assert_eq!(ParseStats::default().parse_rate(), 0.0);
    }
}
