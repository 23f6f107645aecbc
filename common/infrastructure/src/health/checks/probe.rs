use crate::health::Check;
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A check which is flipped by the application, e.g. once the dataset is loaded.
#[derive(Clone)]
pub struct Probe {
    state: Arc<AtomicBool>,
}

pub struct ProbeCheck {
    error: Cow<'static, str>,
    state: Arc<AtomicBool>,
}

impl Probe {
    /// Create a new probe, which initially is down.
    pub fn new(error: impl Into<Cow<'static, str>>) -> (Self, ProbeCheck) {
        let state = Arc::new(AtomicBool::default());
        (
            Self {
                state: state.clone(),
            },
            ProbeCheck {
                error: error.into(),
                state,
            },
        )
    }

    pub fn set(&self, state: bool) {
        self.state.store(state, Ordering::Release);
    }
}

impl Check for ProbeCheck {
    type Error = Cow<'static, str>;

    async fn run(&self) -> Result<(), Self::Error> {
        match self.state.load(Ordering::Acquire) {
            true => Ok(()),
            false => Err(self.error.clone()),
        }
    }
}
