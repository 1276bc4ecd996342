use std::{
    thread::sleep,
    time::{Duration, Instant},
};

use log::trace;

/// Bounded readiness polling.
///
/// `probe` is always called at least once, even with a zero timeout.
/// Polling stops at the first `Some`, at the first error, or once `timeout` has elapsed.
pub fn poll_until<T>(
    timeout: Duration,
    interval: Duration,
    mut probe: impl FnMut() -> anyhow::Result<Option<T>>,
) -> anyhow::Result<Option<T>> {
    let deadline = Instant::now() + timeout;
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        if let Some(value) = probe()? {
            trace!("Ready after {attempts} attempt(s)");
            return Ok(Some(value));
        }
        let now = Instant::now();
        if now >= deadline {
            trace!("Gave up after {attempts} attempt(s)");
            return Ok(None);
        }
        sleep(interval.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::bail;

    use super::poll_until;

    #[test]
    fn zero_timeout_probes_once() {
        let mut calls = 0;
        let res = poll_until(Duration::ZERO, Duration::ZERO, || {
            calls += 1;
            Ok(None::<()>)
        })
        .unwrap();
        assert_eq!(res, None);
        assert_eq!(calls, 1);
    }

    #[test]
    fn returns_first_ready_value() {
        let mut calls = 0;
        let res = poll_until(Duration::from_secs(5), Duration::ZERO, || {
            calls += 1;
            Ok((calls == 3).then_some(calls))
        })
        .unwrap();
        assert_eq!(res, Some(3));
    }

    #[test]
    fn errors_stop_polling() {
        let mut calls = 0;
        let res = poll_until(Duration::from_secs(5), Duration::ZERO, || -> anyhow::Result<Option<()>> {
            calls += 1;
            bail!("gone")
        });
        assert!(res.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn gives_up_after_timeout() {
        let res = poll_until(Duration::from_millis(30), Duration::from_millis(5), || {
            Ok(None::<()>)
        })
        .unwrap();
        assert_eq!(res, None);
    }
}
