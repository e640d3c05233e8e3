mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod forgot_password;
pub use forgot_password::ForgotPassword;

mod shell;
pub use shell::Shell;

mod dashboard;
pub use dashboard::Dashboard;

mod tasks;
pub use tasks::Tasks;

mod loans;
pub use loans::Loans;

mod not_found;
pub use not_found::NotFound;
