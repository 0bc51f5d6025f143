fn main() {
    dj2jinja::cli::run();
}
