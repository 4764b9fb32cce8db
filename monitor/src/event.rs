use log::Level;

pub enum Event {
    Input(crossterm::event::Event),
    Log((Level, String)),
    Shutdown,
    Tick,
}
