fn main() -> eframe::Result {
    env_logger::init();
    spiralsink::shell::run()
}
