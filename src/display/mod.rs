pub mod frame_loop;
pub mod terminal;
