//! Touch gestures expressed as W3C pointer action sequences.

use crate::session::Session;
use scout_common::error::SessionError;
use scout_common::protocol::{ElementHandle, Point, WindowSize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Default duration of a swipe's drag segment.
pub const DEFAULT_SWIPE_MS: u64 = 1000;

/// Default hold time for a long press.
pub const DEFAULT_LONG_PRESS_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(SwipeDirection::Up),
            "down" => Ok(SwipeDirection::Down),
            "left" => Ok(SwipeDirection::Left),
            "right" => Ok(SwipeDirection::Right),
            other => Err(format!("unknown swipe direction: {}", other)),
        }
    }
}

/// Start and end points of a full-screen swipe: 80% to 20% along the travel
/// axis, centred on the other.
pub fn swipe_path(window: WindowSize, direction: SwipeDirection) -> (Point, Point) {
    let width = f64::from(window.width);
    let height = f64::from(window.height);
    let (cx, cy) = (width / 2.0, height / 2.0);
    match direction {
        SwipeDirection::Up => (Point::new(cx, height * 0.8), Point::new(cx, height * 0.2)),
        SwipeDirection::Down => (Point::new(cx, height * 0.2), Point::new(cx, height * 0.8)),
        SwipeDirection::Left => (Point::new(width * 0.8, cy), Point::new(width * 0.2, cy)),
        SwipeDirection::Right => (Point::new(width * 0.2, cy), Point::new(width * 0.8, cy)),
    }
}

fn finger(actions: Vec<Value>) -> Value {
    json!([{
        "type": "pointer",
        "id": "finger1",
        "parameters": { "pointerType": "touch" },
        "actions": actions,
    }])
}

fn pointer_move(point: Point, duration: Duration) -> Value {
    json!({
        "type": "pointerMove",
        "duration": duration.as_millis() as u64,
        "x": point.x.round() as i64,
        "y": point.y.round() as i64,
    })
}

fn pause(duration: Duration) -> Value {
    json!({ "type": "pause", "duration": duration.as_millis() as u64 })
}

/// Press at `from`, hold for `duration`, drag to `to` over `duration`, lift.
pub fn swipe_actions(from: Point, to: Point, duration: Duration) -> Value {
    finger(vec![
        pointer_move(from, Duration::ZERO),
        json!({ "type": "pointerDown", "button": 0 }),
        pause(duration),
        pointer_move(to, duration),
        json!({ "type": "pointerUp", "button": 0 }),
    ])
}

/// Press at `point`, hold for `hold`, lift. A zero hold is a tap.
pub fn press_actions(point: Point, hold: Duration) -> Value {
    let mut actions = vec![
        pointer_move(point, Duration::ZERO),
        json!({ "type": "pointerDown", "button": 0 }),
    ];
    if !hold.is_zero() {
        actions.push(pause(hold));
    }
    actions.push(json!({ "type": "pointerUp", "button": 0 }));
    finger(actions)
}

pub struct Gestures<'a, S: Session + ?Sized> {
    session: &'a mut S,
}

impl<'a, S: Session + ?Sized> Gestures<'a, S> {
    pub fn new(session: &'a mut S) -> Self {
        Self { session }
    }

    pub async fn swipe(
        &mut self,
        from: Point,
        to: Point,
        duration: Duration,
    ) -> Result<(), SessionError> {
        debug!(?from, ?to, "swipe");
        self.perform(swipe_actions(from, to, duration)).await
    }

    /// Swipe across the whole screen in `direction`.
    pub async fn swipe_direction(&mut self, direction: SwipeDirection) -> Result<(), SessionError> {
        let window = self.session.window_size().await?;
        let (from, to) = swipe_path(window, direction);
        debug!(%direction, "swipe across screen");
        self.perform(swipe_actions(
            from,
            to,
            Duration::from_millis(DEFAULT_SWIPE_MS),
        ))
        .await
    }

    pub async fn tap_at(&mut self, point: Point) -> Result<(), SessionError> {
        debug!(?point, "tap");
        self.perform(press_actions(point, Duration::ZERO)).await
    }

    /// Press and hold at the centre of `element`.
    pub async fn long_press(
        &mut self,
        element: &ElementHandle,
        duration: Duration,
    ) -> Result<(), SessionError> {
        let center = self.session.element_rect(element).await?.center();
        debug!(%element, ?center, "long press");
        self.perform(press_actions(center, duration)).await
    }

    async fn perform(&mut self, actions: Value) -> Result<(), SessionError> {
        self.session.perform_actions(actions).await?;
        self.session.release_actions().await
    }
}
