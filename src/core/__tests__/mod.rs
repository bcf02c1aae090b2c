pub mod codebook_test;
