use std::fmt;

/// Decides whether a consumer's fires reach its handler.
///
/// Sampled exactly once per tick. A closed gate does not pause tracking; see
/// [`Consumer`](super::consumer::Consumer) for how transitions are handled.
pub enum EnableGate {
    Fixed(bool),
    Predicate(Box<dyn Fn() -> bool>),
}

impl EnableGate {
    pub fn from_fn(predicate: impl Fn() -> bool + 'static) -> Self {
        EnableGate::Predicate(Box::new(predicate))
    }

    pub fn sample(&self) -> bool {
        match self {
            EnableGate::Fixed(open) => *open,
            EnableGate::Predicate(predicate) => predicate(),
        }
    }
}

impl Default for EnableGate {
    fn default() -> Self {
        EnableGate::Fixed(true)
    }
}

impl From<bool> for EnableGate {
    fn from(open: bool) -> Self {
        EnableGate::Fixed(open)
    }
}

impl fmt::Debug for EnableGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnableGate::Fixed(open) => f.debug_tuple("Fixed").field(open).finish(),
            EnableGate::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
