//! Animation primitives driven by the element `update` tick

/// Base trait for animations
pub trait Animation {
    /// Advance one tick. Returns true once the animation has settled.
    fn update(&mut self, delta_time: f32) -> bool;
}

/// Linear opacity ease toward a target.
///
/// The step is a fixed count per `update` call; `delta_time` is ignored,
/// so fade duration follows the frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    opacity: u8,
    target: u8,
    speed: u8,
}

impl Fade {
    pub const OPAQUE: u8 = 255;
    pub const TRANSPARENT: u8 = 0;

    pub fn new(speed: u8) -> Self {
        Self {
            opacity: Self::OPAQUE,
            target: Self::OPAQUE,
            speed: speed.max(1),
        }
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// A zero step would never reach the target, so it is raised to 1.
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.max(1);
    }

    pub fn set_target(&mut self, target: u8) {
        self.target = target;
    }

    /// Jump to transparent and head back to fully opaque.
    pub fn restart_in(&mut self) {
        self.opacity = Self::TRANSPARENT;
        self.target = Self::OPAQUE;
    }

    pub fn fade_out(&mut self) {
        self.target = Self::TRANSPARENT;
    }

    /// Faded all the way out and not heading anywhere else.
    pub fn is_gone(&self) -> bool {
        self.opacity == Self::TRANSPARENT && self.target == Self::TRANSPARENT
    }
}

impl Animation for Fade {
    fn update(&mut self, _delta_time: f32) -> bool {
        if self.opacity < self.target {
            self.opacity = self.opacity.saturating_add(self.speed).min(self.target);
        } else if self.opacity > self.target {
            self.opacity = self.opacity.saturating_sub(self.speed).max(self.target);
        }
        self.opacity == self.target
    }
}

/// Time-based visibility toggle, used for text cursors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blink {
    interval: f32,
    timer: f32,
    visible: bool,
}

impl Blink {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            timer: 0.0,
            visible: true,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval;
    }

    /// Back to the visible phase with a fresh timer.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.visible = true;
    }
}

impl Animation for Blink {
    fn update(&mut self, delta_time: f32) -> bool {
        self.timer += delta_time;
        if self.timer >= self.interval {
            self.visible = !self.visible;
            self.timer = 0.0;
        }
        // Non termina mai
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_takes_ceil_steps() {
        let mut fade = Fade::new(5);
        fade.restart_in();
        assert_eq!(fade.opacity(), 0);

        for _ in 0..50 {
            assert!(!fade.update(0.0));
        }
        assert_eq!(fade.opacity(), 250);
        assert!(fade.update(0.0));
        assert_eq!(fade.opacity(), 255);

        fade.update(10.0);
        assert_eq!(fade.opacity(), 255);
    }

    #[test]
    fn test_fade_does_not_overshoot() {
        let mut fade = Fade::new(100);
        fade.set_target(30);
        fade.update(0.016);
        assert_eq!(fade.opacity(), 155);
        fade.update(0.016);
        assert_eq!(fade.opacity(), 55);
        fade.update(0.016);
        assert_eq!(fade.opacity(), 30);
        assert!(!fade.is_gone());
    }

    #[test]
    fn test_fade_ignores_delta() {
        let mut slow = Fade::new(5);
        let mut fast = Fade::new(5);
        slow.fade_out();
        fast.fade_out();
        slow.update(0.001);
        fast.update(5.0);
        assert_eq!(slow.opacity(), fast.opacity());
    }

    #[test]
    fn test_zero_speed_still_finishes() {
        let mut fade = Fade::new(0);
        assert_eq!(fade.speed(), 1);
        fade.set_speed(0);
        fade.fade_out();
        for _ in 0..255 {
            fade.update(0.016);
        }
        assert!(fade.is_gone());
    }

    #[test]
    fn test_fade_out_reaches_gone() {
        let mut fade = Fade::new(51);
        fade.fade_out();
        for _ in 0..5 {
            fade.update(0.0);
        }
        assert!(fade.is_gone());
    }

    #[test]
    fn test_blink_toggles_on_interval() {
        let mut blink = Blink::new(0.5);
        assert!(blink.visible());
        blink.update(0.25);
        assert!(blink.visible());
        blink.update(0.25);
        assert!(!blink.visible());
        blink.update(0.5);
        assert!(blink.visible());

        blink.update(0.6);
        blink.reset();
        assert!(blink.visible());
    }
}
