use crate::core::{Bracket, Codebook, QuiverError};

#[test]
fn 코드북_생성_검증_테스트() {
    let codebook = Codebook::new(vec![-1.0, 0.5, 2.0]).unwrap();
    assert_eq!(codebook.len(), 3);
    assert_eq!(codebook.min(), -1.0);
    assert_eq!(codebook.max(), 2.0);

    assert!(matches!(Codebook::new(vec![]), Err(QuiverError::InvalidInput(_))));
    assert!(matches!(
        Codebook::new(vec![1.0, 1.0]),
        Err(QuiverError::InvalidInput(_))
    ));
    assert!(matches!(
        Codebook::new(vec![2.0, 1.0]),
        Err(QuiverError::InvalidInput(_))
    ));
    assert!(matches!(
        Codebook::new(vec![0.0, f64::NAN]),
        Err(QuiverError::InvalidInput(_))
    ));
}

#[test]
fn 이진탐색_구간_찾기_테스트() {
    let codebook = Codebook::new(vec![0.0, 1.0, 4.0]).unwrap();

    assert_eq!(codebook.bracket(0.0), Bracket::Exact(0.0));
    assert_eq!(codebook.bracket(4.0), Bracket::Exact(4.0));
    assert_eq!(codebook.bracket(0.3), Bracket::Between { lo: 0.0, hi: 1.0 });
    assert_eq!(codebook.bracket(2.5), Bracket::Between { lo: 1.0, hi: 4.0 });
    assert_eq!(codebook.bracket(-0.1), Bracket::Below(0.0));
    assert_eq!(codebook.bracket(4.1), Bracket::Above(4.0));

    assert!(codebook.contains_range(2.0));
    assert!(!codebook.contains_range(5.0));
}

#[test]
fn 코드북_직렬화_검증_테스트() {
    let codebook = Codebook::new(vec![0.25, 0.5, 1.0]).unwrap();
    let json = serde_json::to_string(&codebook).unwrap();
    assert_eq!(json, "[0.25,0.5,1.0]");

    let restored: Codebook = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, codebook);

    // 역직렬화도 엄격한 증가 조건을 검사
    assert!(serde_json::from_str::<Codebook>("[1.0,0.5]").is_err());
}
