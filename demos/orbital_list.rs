use detcode::{
    decode_pair,
    par_read_states,
    read_orbital_chunk,
    MemStore,
    Store,
};

fn main() {
    let mo_num = 150;
    let num_states = 3;
    let mut store = MemStore::new(mo_num, num_states).unwrap();
    let int64_num = store.layout().int64_num();

    // up: orbitals 1-4, 7, 65, 129, 131, 132; down varies per determinant
    let dets: Vec<u64> = (0..10u64)
        .flat_map(|i| [79, 1, 13, 1 << i, 0, 0])
        .collect();
    let chunk = 4 * store.layout().det_len();
    for (n, words) in dets.chunks(chunk).enumerate() {
        store.write_determinants(n * 4, words).unwrap();
    }

    for state in 0..num_states {
        store.set_state(state).unwrap();
        let coeffs: Vec<f64> =
            (0..10).map(|i| (state * 10 + i) as f64 / 100.0).collect();
        store.write_coefficients(0, &coeffs).unwrap();
    }

    let (up, down) = decode_pair(int64_num, &dets[..2 * int64_num]).unwrap();
    println!("first determinant: up={up:?} down={down:?}");

    for (i, (up, down)) in read_orbital_chunk(&store, 5, 3)
        .unwrap()
        .into_iter()
        .enumerate()
    {
        println!("det {}: {} up, down={down:?}", i + 5, up.len());
    }

    let coeffs = par_read_states(&store, &[0, 1, 2], 2, 4).unwrap();
    for (state, c) in coeffs.iter().enumerate() {
        println!("state {state}: {c:?}");
    }
}
