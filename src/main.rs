fn main() {
    if let Err(err) = orgchart_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
