#![cfg(not(tarpaulin_include))]

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Render both charts from sample scores and write them next to the binary's cwd
    let graphs = eor_dashboard::graph::create_example_graphs()?;

    for (name, svg) in graphs {
        let file_path = format!("{}_graph.svg", name);
        eor_dashboard::graph::save_graph(&svg, &file_path)?;
        println!("Created {} graph at {}", name, file_path);
    }

    Ok(())
}
