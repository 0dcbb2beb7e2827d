fn main() {
    std::process::exit(lucky_draw::run());
}
