pub mod certificates;
pub mod dialogs;
pub mod finance;
pub mod login;
pub mod modules;
pub mod nav_menu;
pub mod payment;
pub mod profile;
pub mod register;
pub mod settings;

pub use certificates::certificates_screen;
pub use finance::finance_screen;
pub use login::login_screen;
pub use modules::modules_screen;
pub use nav_menu::nav_menu;
pub use payment::payment_screen;
pub use profile::profile_screen;
pub use register::register_screen;
pub use settings::settings_screen;
