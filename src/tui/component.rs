use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the chat screen that draws itself into a rectangle.
///
/// Props arrive as struct fields, set by the parent before each frame.
/// `render` takes `&mut self` so a component can update presentation state
/// (scroll offsets, cached heights) while drawing, the same way ratatui's
/// `StatefulWidget` does.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The high-level event this component reports to its parent.
    type Event;

    /// Handle a `TuiEvent`, returning a high-level event when the parent must act.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
