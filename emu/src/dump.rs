use color_print::cprint;

/// Terminal dump of the full working memory, 16 cells per row, printed
/// once the machine halts.
pub fn print_dump(mem: &[u8]) {
    println!("========== Memory Dump ==========");
    for (i, byte) in mem.iter().enumerate() {
        cprint!("<blue>{:3X}</>:<yellow>{:3X}</> ", i, byte);
        if i % 16 == 15 {
            println!();
        }
    }
    if mem.len() % 16 != 0 {
        println!();
    }
}
