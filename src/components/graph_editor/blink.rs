//! Repeating timer behind the blinking selection cursor.

use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;

/// A repeating timer the session restarts on selection changes and cancels
/// whenever it forces a cursor off.
pub trait BlinkTimer {
	/// Cancel any pending ticks and start ticking every `period`.
	fn restart(&mut self, period: Duration);
	/// Stop ticking. Cancelling an idle timer is a no-op.
	fn cancel(&mut self);
}

/// Browser interval driving `on_tick`.
pub struct IntervalBlink {
	handle: Option<IntervalHandle>,
	on_tick: Rc<dyn Fn()>,
}

impl IntervalBlink {
	pub fn new(on_tick: impl Fn() + 'static) -> Self {
		Self {
			handle: None,
			on_tick: Rc::new(on_tick),
		}
	}
}

impl BlinkTimer for IntervalBlink {
	fn restart(&mut self, period: Duration) {
		self.cancel();
		let on_tick = self.on_tick.clone();
		match set_interval_with_handle(move || on_tick(), period) {
			Ok(handle) => self.handle = Some(handle),
			Err(err) => log::warn!("could not start cursor blink: {:?}", err),
		}
	}

	fn cancel(&mut self) {
		if let Some(handle) = self.handle.take() {
			handle.clear();
		}
	}
}

impl Drop for IntervalBlink {
	fn drop(&mut self) {
		self.cancel();
	}
}
