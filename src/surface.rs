// ============================================================================
// SURFACE FITTING — keep a surface's backing resolution at density × display
// ============================================================================
//
// `fit_surface` is the one-shot check. `AutoResize` wraps it with a per-
// instance debounce for resize notifications: the first notification in a
// quiet period re-fits immediately, later ones inside the window are dropped,
// and one trailing re-fit runs when the window closes. The host drives the
// trailing check by calling `poll` from its event loop.

use std::time::{Duration, Instant};

/// Default debounce window for resize notifications.
pub const DEFAULT_RESIZE_WINDOW: Duration = Duration::from_millis(300);

/// Default backing-store density (backing pixels per displayed pixel).
pub const DEFAULT_DENSITY: u32 = 2;

/// A drawing surface with a displayed size and a separate backing resolution.
pub trait Surface {
    /// Size the surface occupies on screen.
    fn displayed_size(&self) -> (u32, u32);
    /// Resolution of the pixel buffer behind it.
    fn backing_size(&self) -> (u32, u32);
    fn set_backing_size(&mut self, width: u32, height: u32);
}

/// Resize the backing store to `density × displayed` and call `render`.
///
/// Does nothing when the backing store already has exactly that size.
/// Returns whether a resize happened.
pub fn fit_surface<S, F>(surface: &mut S, density: u32, render: &mut F) -> bool
where
    S: Surface + ?Sized,
    F: FnMut(&mut S) + ?Sized,
{
    let (dw, dh) = surface.displayed_size();
    let target = (dw.saturating_mul(density), dh.saturating_mul(density));
    if surface.backing_size() == target {
        return false;
    }
    surface.set_backing_size(target.0, target.1);
    crate::log_info!(
        "Surface backing resized to {}x{} (displayed {}x{})",
        target.0,
        target.1,
        dw,
        dh
    );
    render(surface);
    true
}

/// Debounced auto-fit state for one surface.
///
/// Each viewer owns its own instance, so independent viewers never share
/// timer state. Dropping or [`dispose`](AutoResize::dispose)-ing it is the
/// unsubscribe: no trailing fit will run afterwards.
#[derive(Debug)]
pub struct AutoResize {
    density: u32,
    window: Duration,
    /// Set while a debounce window is open; holds when the trailing fit is due.
    trailing_due: Option<Instant>,
}

impl AutoResize {
    /// Fit the surface right away and start tracking resizes for it.
    pub fn attach<S, F>(surface: &mut S, density: u32, window: Duration, render: &mut F) -> Self
    where
        S: Surface + ?Sized,
        F: FnMut(&mut S) + ?Sized,
    {
        let density = density.max(1);
        fit_surface(surface, density, render);
        Self {
            density,
            window,
            trailing_due: None,
        }
    }

    pub fn density(&self) -> u32 {
        self.density
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// True while a debounce window is open.
    pub fn is_pending(&self) -> bool {
        self.trailing_due.is_some()
    }

    /// Resize listener. Re-fits immediately unless a window is already open,
    /// in which case the notification is absorbed by the pending trailing fit.
    pub fn notify_resize<S, F>(&mut self, now: Instant, surface: &mut S, render: &mut F)
    where
        S: Surface + ?Sized,
        F: FnMut(&mut S) + ?Sized,
    {
        if self.trailing_due.is_some() {
            return;
        }
        fit_surface(surface, self.density, render);
        self.trailing_due = Some(now + self.window);
    }

    /// Run the trailing fit once its window has elapsed.
    ///
    /// Returns the time left until the trailing fit while one is pending, so
    /// the host can schedule a wake-up; `None` when nothing is pending.
    pub fn poll<S, F>(&mut self, now: Instant, surface: &mut S, render: &mut F) -> Option<Duration>
    where
        S: Surface + ?Sized,
        F: FnMut(&mut S) + ?Sized,
    {
        let due = self.trailing_due?;
        if now < due {
            return Some(due - now);
        }
        self.trailing_due = None;
        fit_surface(surface, self.density, render);
        None
    }

    /// Stop tracking; any pending trailing fit is discarded.
    pub fn dispose(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeSurface {
        displayed: (u32, u32),
        backing: (u32, u32),
    }

    impl Surface for FakeSurface {
        fn displayed_size(&self) -> (u32, u32) {
            self.displayed
        }
        fn backing_size(&self) -> (u32, u32) {
            self.backing
        }
        fn set_backing_size(&mut self, width: u32, height: u32) {
            self.backing = (width, height);
        }
    }

    fn surface(displayed: (u32, u32), backing: (u32, u32)) -> FakeSurface {
        FakeSurface { displayed, backing }
    }

    #[test]
    fn fit_doubles_displayed_size_and_renders() {
        let mut s = surface((100, 50), (0, 0));
        let mut renders = 0;
        assert!(fit_surface(&mut s, 2, &mut |_: &mut FakeSurface| renders += 1));
        assert_eq!(s.backing, (200, 100));
        assert_eq!(renders, 1);
    }

    #[test]
    fn fit_skips_matching_surface() {
        let mut s = surface((100, 50), (200, 100));
        let mut renders = 0;
        assert!(!fit_surface(&mut s, 2, &mut |_: &mut FakeSurface| renders += 1));
        assert_eq!(renders, 0);
    }

    #[test]
    fn fit_resizes_when_only_height_differs() {
        let mut s = surface((100, 50), (200, 50));
        let mut renders = 0;
        assert!(fit_surface(&mut s, 2, &mut |_: &mut FakeSurface| renders += 1));
        assert_eq!(s.backing, (200, 100));
        assert_eq!(renders, 1);
    }

    #[test]
    fn attaching_twice_to_fitted_surface_renders_nothing() {
        let mut s = surface((64, 64), (128, 128));
        let mut renders = 0;
        let mut render = |_: &mut FakeSurface| renders += 1;
        let a = AutoResize::attach(&mut s, 2, DEFAULT_RESIZE_WINDOW, &mut render);
        let b = AutoResize::attach(&mut s, 2, DEFAULT_RESIZE_WINDOW, &mut render);
        a.dispose();
        b.dispose();
        assert_eq!(renders, 0);
    }

    #[test]
    fn burst_of_resizes_fits_at_most_twice_per_window() {
        let start = Instant::now();
        let mut s = surface((10, 10), (20, 20));
        let mut renders = 0;
        let mut render = |_: &mut FakeSurface| renders += 1;
        let mut auto = AutoResize::attach(&mut s, 2, DEFAULT_RESIZE_WINDOW, &mut render);

        // Leading fit on the first notification.
        s.displayed = (11, 11);
        auto.notify_resize(start, &mut s, &mut render);
        assert_eq!(s.backing, (22, 22));

        // Many more inside the window are absorbed.
        for i in 1..50u32 {
            s.displayed = (11 + i, 11 + i);
            let t = start + Duration::from_millis(i as u64 * 5);
            auto.notify_resize(t, &mut s, &mut render);
            assert!(auto.poll(t, &mut s, &mut render).is_some());
        }
        assert_eq!(s.backing, (22, 22));
        assert!(auto.is_pending());

        // Trailing fit catches the final size.
        let left = auto.poll(start + Duration::from_millis(299), &mut s, &mut render);
        assert_eq!(left, Some(Duration::from_millis(1)));
        assert_eq!(auto.poll(start + DEFAULT_RESIZE_WINDOW, &mut s, &mut render), None);
        assert_eq!(s.backing, (120, 120));
        assert!(!auto.is_pending());

        drop(render);
        assert_eq!(renders, 2);
    }

    #[test]
    fn trailing_fit_is_skipped_when_size_settled() {
        let start = Instant::now();
        let mut s = surface((10, 10), (0, 0));
        let mut renders = 0;
        let mut render = |_: &mut FakeSurface| renders += 1;
        let mut auto = AutoResize::attach(&mut s, 2, DEFAULT_RESIZE_WINDOW, &mut render);
        s.displayed = (30, 30);
        auto.notify_resize(start, &mut s, &mut render);
        auto.poll(start + Duration::from_secs(1), &mut s, &mut render);
        // poll with nothing pending is inert
        assert_eq!(auto.poll(start + Duration::from_secs(2), &mut s, &mut render), None);
        drop(render);
        assert_eq!(renders, 2);
    }

    #[test]
    fn new_window_opens_after_trailing_fit() {
        let start = Instant::now();
        let mut s = surface((10, 10), (20, 20));
        let mut renders = 0;
        let mut render = |_: &mut FakeSurface| renders += 1;
        let mut auto = AutoResize::attach(&mut s, 2, DEFAULT_RESIZE_WINDOW, &mut render);

        s.displayed = (12, 12);
        auto.notify_resize(start, &mut s, &mut render);
        auto.poll(start + DEFAULT_RESIZE_WINDOW, &mut s, &mut render);

        s.displayed = (14, 14);
        auto.notify_resize(start + Duration::from_millis(400), &mut s, &mut render);
        assert_eq!(s.backing, (28, 28));
        drop(render);
        assert_eq!(renders, 2);
    }

    #[test]
    fn zero_density_is_treated_as_one() {
        let mut s = surface((8, 8), (0, 0));
        let auto = AutoResize::attach(&mut s, 0, DEFAULT_RESIZE_WINDOW, &mut |_: &mut FakeSurface| {});
        assert_eq!(auto.density(), 1);
        assert_eq!(s.backing, (8, 8));
    }
}
