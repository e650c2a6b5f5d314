use flex_error::define_error;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        EmptyMerkleProof
            |_| { "empty merkle proof" },

        EmptyCommitmentPrefix
            |_| { "empty commitment prefix" },

        EmptyCommitmentRoot
            |_| { "empty commitment root" },
    }
}
