use crate::core::state::ChatRoom;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

pub fn draw_ui(frame: &mut Frame, room: &ChatRoom, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    // Messages first: the title bar reads has_unseen_content from this frame
    MessageList::new(&mut tui.message_list, room, &tui.default_avatar).render(frame, main_area);

    let mut title_bar = TitleBar::new(
        room.app_name.clone(),
        room.identity.label().to_string(),
        room.status_message.clone(),
    );
    title_bar.is_sending = room.is_sending();
    title_bar.has_unseen_content = tui.message_list.has_unseen_content;
    title_bar.render(frame, title_area);

    tui.input_box.render(frame, input_area);
}
