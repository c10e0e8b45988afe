use crate::browser;
use crate::engine::{Point, VIEW_WIDTH};
use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

/// Everything the game sees for one animation frame: the wall clock, the
/// time since the previous frame, and the pointer/keyboard events captured
/// since then. Event handlers only enqueue; all state mutation happens in
/// the frame callback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameInput {
    pub now_ms: f64,
    pub delta_ms: f64,
    pub cursor_x: f32,
    pub clicks: Vec<Point>,
    pub keys: Vec<String>,
}

pub struct InputQueue {
    clicks: Rc<RefCell<Vec<Point>>>,
    keys: Rc<RefCell<Vec<String>>>,
    cursor_x: Rc<Cell<f32>>,
}

impl InputQueue {
    pub fn attach(canvas: &HtmlCanvasElement) -> Result<Self> {
        let clicks: Rc<RefCell<Vec<Point>>> = Rc::new(RefCell::new(Vec::new()));
        let keys: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let cursor_x = Rc::new(Cell::new(VIEW_WIDTH / 2.0));

        let click_sink = clicks.clone();
        let on_click = browser::closure_wrap(Box::new(move |event: MouseEvent| {
            click_sink.borrow_mut().push(Point {
                x: event.offset_x() as f32,
                y: event.offset_y() as f32,
            });
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(|err| anyhow::anyhow!("Cannot attach click listener {:#?}", err))?;
        on_click.forget();

        let cursor_sink = cursor_x.clone();
        let on_move = browser::closure_wrap(Box::new(move |event: MouseEvent| {
            cursor_sink.set(event.offset_x() as f32);
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas
            .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())
            .map_err(|err| anyhow::anyhow!("Cannot attach mousemove listener {:#?}", err))?;
        on_move.forget();

        let key_sink = keys.clone();
        let on_key = browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
            key_sink.borrow_mut().push(event.key());
        }) as Box<dyn FnMut(KeyboardEvent)>);
        browser::window()?
            .add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())
            .map_err(|err| anyhow::anyhow!("Cannot attach keydown listener {:#?}", err))?;
        on_key.forget();

        Ok(InputQueue {
            clicks,
            keys,
            cursor_x,
        })
    }

    pub fn drain(&self, now_ms: f64, delta_ms: f64) -> FrameInput {
        FrameInput {
            now_ms,
            delta_ms,
            cursor_x: self.cursor_x.get(),
            clicks: self.clicks.borrow_mut().drain(..).collect(),
            keys: self.keys.borrow_mut().drain(..).collect(),
        }
    }
}
