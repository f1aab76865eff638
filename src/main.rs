fn main() {
    if let Err(err) = canvas_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
