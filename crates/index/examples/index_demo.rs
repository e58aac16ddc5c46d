use index::{Document, VectorIndex};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let index = VectorIndex::build(vec![
        Document::new("log1.txt", "The car was red.", vec![0.9, 0.1, 0.0]),
        Document::new("log2.txt", "The officer arrived at noon.", vec![0.1, 0.8, 0.2]),
        Document::new("log3.txt", "Nothing unusual was reported.", vec![0.0, 0.2, 0.9]),
    ])?;
    println!("Indexed {} documents of dimension {}.", index.len(), index.dimension());

    for hit in index.search(&[0.8, 0.2, 0.1], 2)? {
        println!("{:>8.4}  {}  {}", hit.score, hit.source, hit.content);
    }

    Ok(())
}
