//! Process-level configuration read from environment variables.

/// Name of the environment variable which selects the default engine.
pub const ENGINE_VAR: &str = "NDKIT_ENGINE";

/// Name of the environment variable which sets the number of threads used
/// by the parallel engine.
pub const NUM_THREADS_VAR: &str = "NDKIT_NUM_THREADS";

/// Return the value of an environment variable, or `None` if it is unset or
/// empty.
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a thread count, clamping it to `[1, max_threads]`.
///
/// Returns `None` and logs a warning if `s` is not a number.
pub fn parse_thread_count(s: &str, max_threads: usize) -> Option<usize> {
    match s.trim().parse::<usize>() {
        Ok(n) => Some(n.clamp(1, max_threads.max(1))),
        Err(_) => {
            log::warn!(
                "Unrecognized value \"{}\" for {}, using default thread count",
                s,
                NUM_THREADS_VAR
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use ndkit_testing::TestCases;

    use super::parse_thread_count;

    #[test]
    fn test_parse_thread_count() {
        #[derive(Debug)]
        struct Case {
            value: &'static str,
            expected: Option<usize>,
        }

        let cases = [
            Case {
                value: "4",
                expected: Some(4),
            },
            Case {
                value: " 2 ",
                expected: Some(2),
            },
            Case {
                value: "0",
                expected: Some(1),
            },
            Case {
                value: "1000",
                expected: Some(8),
            },
            Case {
                value: "many",
                expected: None,
            },
        ];

        cases.test_each(|case| {
            assert_eq!(parse_thread_count(case.value, 8), case.expected);
        })
    }
}
