fn main() {
    if let Err(err) = battery_health_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
