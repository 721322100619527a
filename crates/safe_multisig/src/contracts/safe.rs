use alloy_sol_types::sol;

sol! {
    /// The slice of the Safe v1.3.0+ interface this crate talks to.
    interface Safe {
        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address payable refundReceiver,
            bytes memory signatures
        ) external payable returns (bool success);

        function nonce() external view returns (uint256);

        function getThreshold() external view returns (uint256);

        function getOwners() external view returns (address[] memory);

        function domainSeparator() external view returns (bytes32);
    }
}
