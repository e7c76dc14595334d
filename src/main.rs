fn main() {
    dvr_clock_check_lib::run()
}
