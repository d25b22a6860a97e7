fn main() {
    klartext_lib::run()
}
