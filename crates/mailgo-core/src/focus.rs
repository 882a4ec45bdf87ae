//! Tab focus trap for the visible modal.
//!
//! The host collects the modal's focusable controls in document order and
//! asks [`tab_target`] where Tab should land. Only the wrap points are
//! handled here; between them the browser moves focus itself.

/// Index of the control that should receive focus, or `None` to let the
/// browser move focus normally.
///
/// `current` is the index of the focused control, `None` when focus is on
/// the modal container or outside it.
#[must_use]
pub fn tab_target(count: usize, current: Option<usize>, backwards: bool) -> Option<usize> {
    let last = count.checked_sub(1)?;
    match current {
        None if backwards => Some(last),
        None => Some(0),
        Some(0) if backwards => Some(last),
        Some(i) if !backwards && i >= last => Some(0),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_wraps_from_last_to_first() {
        assert_eq!(tab_target(4, Some(3), false), Some(0));
    }

    #[test]
    fn backward_wraps_from_first_to_last() {
        assert_eq!(tab_target(4, Some(0), true), Some(3));
    }

    #[test]
    fn middle_controls_are_left_to_the_browser() {
        assert_eq!(tab_target(4, Some(1), false), None);
        assert_eq!(tab_target(4, Some(2), true), None);
        assert_eq!(tab_target(4, Some(0), false), None);
        assert_eq!(tab_target(4, Some(3), true), None);
    }

    #[test]
    fn focus_outside_enters_at_the_edge() {
        assert_eq!(tab_target(4, None, false), Some(0));
        assert_eq!(tab_target(4, None, true), Some(3));
    }

    #[test]
    fn single_control_keeps_focus() {
        assert_eq!(tab_target(1, Some(0), false), Some(0));
        assert_eq!(tab_target(1, Some(0), true), Some(0));
    }

    #[test]
    fn nothing_focusable() {
        assert_eq!(tab_target(0, None, false), None);
        assert_eq!(tab_target(0, None, true), None);
    }
}
