pub enum WorkerMessage {
    Cancel,
    Kill,
}
