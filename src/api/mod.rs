pub mod cvd;
pub mod palettes;
pub mod params;
pub mod state;

pub use cvd::{
    __path_handle_set_simulation, __path_handle_simulate, __path_handle_toggle_simulation,
};
pub use cvd::{
    handle_set_simulation, handle_simulate, handle_toggle_simulation, SimulateRequest,
    SimulateResponse,
};
pub use palettes::{__path_handle_list_palettes, __path_handle_palette_colors};
pub use palettes::{handle_list_palettes, handle_palette_colors, BuiltinPaletteResponse};
pub use params::{__path_handle_generate, __path_handle_parse, __path_handle_update_params};
pub use params::{
    handle_generate, handle_parse, handle_update_params, AcceptedResponse, ParseRequest,
    ParseResponse,
};
pub use state::{handle_events, handle_state, __path_handle_state};
