//! Size guard applied to every inbound fragment.

use crate::{error::SizeExceeded, limit::MessageSizeLimit};

/// Check whether `incoming` more units fit on top of `current`.
///
/// Returns the new running total on success. The check runs per fragment, so
/// a first fragment that is already larger than the limit is rejected before
/// anything is buffered. A total equal to the limit is accepted.
///
/// # Errors
///
/// Returns [`SizeExceeded`] when the new total would exceed `limit`, or when
/// the total overflows `usize`.
///
/// # Examples
///
/// ```
/// use wslimit::{MessageSizeLimit, guard::check_fragment};
///
/// let limit = MessageSizeLimit::bounded(5);
/// assert_eq!(check_fragment(3, 2, limit), Ok(5));
/// assert!(check_fragment(3, 3, limit).is_err());
/// ```
pub fn check_fragment(
    current: usize,
    incoming: usize,
    limit: MessageSizeLimit,
) -> Result<usize, SizeExceeded> {
    let Some(max) = limit.get() else {
        return Ok(current.saturating_add(incoming));
    };

    let Some(total) = current.checked_add(incoming) else {
        return Err(SizeExceeded {
            attempted: usize::MAX,
            limit: max,
        });
    };

    if total > max {
        return Err(SizeExceeded {
            attempted: total,
            limit: max,
        });
    }

    Ok(total)
}
