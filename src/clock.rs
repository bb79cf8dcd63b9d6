use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    /// Local hour of day, `0..24`.
    fn local_hour(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        js_sys::Date::new_0().get_hours()
    }
}

/// A settable clock; clones observe the same hour.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    hour: Rc<Cell<u32>>,
}

impl FixedClock {
    pub fn at(hour: u32) -> Self {
        Self {
            hour: Rc::new(Cell::new(hour % 24)),
        }
    }

    pub fn set_hour(&self, hour: u32) {
        self.hour.set(hour % 24);
    }
}

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.hour.get()
    }
}
