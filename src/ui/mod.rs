pub mod panels;
pub mod plot;
pub mod preview;
pub mod widgets;
