fn main() {
    touch_pong::game::run();
}
