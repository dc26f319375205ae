fn main() {
    if let Err(err) = skymap_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
