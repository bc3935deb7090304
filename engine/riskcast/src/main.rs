fn main() {
    std::process::exit(riskcast::run_cli());
}
