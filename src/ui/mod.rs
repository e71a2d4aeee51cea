mod quiz;
pub mod selector;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::client::DataSource;

pub use selector::{ChoiceState, RadioGroup, RadioOption, render_radio_group};

pub fn render<S: DataSource>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    quiz::render(frame, area, app);
}
