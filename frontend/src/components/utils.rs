use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::Date;
use yew::prelude::*;

pub fn generate_id() -> u64 {
    (Date::new_0().get_time() * 1000.0 + js_sys::Math::random() * 1000.0) as u64
}

pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

/// Shortens a display name to at most `max_chars` characters, appending an
/// ellipsis. Operates on char boundaries so multi-byte filenames are safe.
pub fn ellipsize(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let head: String = name.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}

pub fn format_confidence(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "N/A".to_string(),
    }
}

pub fn format_seconds(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}s"),
        None => "N/A".to_string(),
    }
}
